// lib/src/storage_engine/csv_storage.rs
//! One CSV file per entity type under a data directory.
//!
//! Every file starts with a fixed header row. List valued columns
//! (an outcome's prescriptions) are joined with `;`. A save writes every
//! file to a temporary sibling first and renames them into place only once
//! all of them were written.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim, WriterBuilder};
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use models::{
    Account, Administrator, ClinicError, ClinicResult, Doctor, Outcome, Patient, Pharmacist, Role,
    User,
};

use crate::storage_engine::{ClinicStore, Collection, StorageEngine};

pub const PATIENTS_FILE: &str = "patients.csv";
pub const STAFF_FILE: &str = "staff.csv";
pub const SLOTS_FILE: &str = "slots.csv";
pub const APPOINTMENTS_FILE: &str = "appointments.csv";
pub const OUTCOMES_FILE: &str = "outcomes.csv";
pub const PRESCRIPTIONS_FILE: &str = "prescriptions.csv";
pub const MEDICATIONS_FILE: &str = "medications.csv";
pub const REQUESTS_FILE: &str = "replenishment_requests.csv";

const DATA_FILES: &[&str] = &[
    PATIENTS_FILE,
    STAFF_FILE,
    SLOTS_FILE,
    APPOINTMENTS_FILE,
    OUTCOMES_FILE,
    PRESCRIPTIONS_FILE,
    MEDICATIONS_FILE,
    REQUESTS_FILE,
];

const PATIENT_HEADERS: &[&str] = &[
    "user_id", "password", "name", "date_of_birth", "gender", "blood_type", "email", "phone",
];
const STAFF_HEADERS: &[&str] = &[
    "user_id", "password", "name", "role", "gender", "age", "email", "phone", "specialisation",
];
const SLOT_HEADERS: &[&str] = &["slot_id", "doctor_id", "date", "start_time", "end_time", "status"];
const APPOINTMENT_HEADERS: &[&str] = &[
    "appointment_id", "patient_id", "doctor_id", "slot_id", "status", "outcome_id",
];
const OUTCOME_HEADERS: &[&str] = &[
    "outcome_id", "appointment_id", "date", "service_provided", "prescription_ids", "consultation_notes",
];
const PRESCRIPTION_HEADERS: &[&str] = &[
    "prescription_id", "appointment_id", "medication_id", "quantity", "status", "notes",
];
const MEDICATION_HEADERS: &[&str] = &["medication_id", "name", "stock_level", "low_stock_alert_level"];
const REQUEST_HEADERS: &[&str] = &[
    "request_id", "medication_id", "quantity", "status", "requested_by", "approved_by",
];

const LIST_SEPARATOR: char = ';';

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PatientRow {
    user_id: String,
    password: String,
    name: String,
    date_of_birth: NaiveDate,
    gender: String,
    blood_type: String,
    email: Option<String>,
    phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StaffRow {
    user_id: String,
    password: String,
    name: String,
    role: Role,
    gender: String,
    age: u32,
    email: Option<String>,
    phone: Option<String>,
    specialisation: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OutcomeRow {
    outcome_id: String,
    appointment_id: String,
    date: NaiveDate,
    service_provided: String,
    prescription_ids: String,
    consultation_notes: String,
}

fn account_from_parts(
    user_id: String,
    password: String,
    name: String,
    gender: String,
    email: Option<String>,
    phone: Option<String>,
) -> Account {
    Account {
        user_id,
        password,
        name,
        gender,
        email,
        phone,
    }
}

impl From<PatientRow> for User {
    fn from(row: PatientRow) -> Self {
        User::Patient(Patient {
            account: account_from_parts(row.user_id, row.password, row.name, row.gender, row.email, row.phone),
            date_of_birth: row.date_of_birth,
            blood_type: row.blood_type,
        })
    }
}

impl TryFrom<StaffRow> for User {
    type Error = ClinicError;

    fn try_from(row: StaffRow) -> Result<Self, Self::Error> {
        let role = row.role;
        let age = row.age;
        let specialisation = row.specialisation;
        let account = account_from_parts(row.user_id, row.password, row.name, row.gender, row.email, row.phone);
        match role {
            Role::Doctor => Ok(User::Doctor(Doctor {
                account,
                age,
                specialisation: specialisation.unwrap_or_else(|| "General Practice".to_string()),
            })),
            Role::Pharmacist => Ok(User::Pharmacist(Pharmacist { account, age })),
            Role::Administrator => Ok(User::Administrator(Administrator { account, age })),
            Role::Patient => Err(ClinicError::Storage(format!(
                "{} lists {} with role Patient; patients belong in {}",
                STAFF_FILE, account.user_id, PATIENTS_FILE
            ))),
        }
    }
}

fn patient_row(patient: &Patient) -> PatientRow {
    let account = &patient.account;
    PatientRow {
        user_id: account.user_id.clone(),
        password: account.password.clone(),
        name: account.name.clone(),
        date_of_birth: patient.date_of_birth,
        gender: account.gender.clone(),
        blood_type: patient.blood_type.clone(),
        email: account.email.clone(),
        phone: account.phone.clone(),
    }
}

fn staff_row(user: &User) -> Option<StaffRow> {
    let age = user.staff_age()?;
    let account = user.account();
    Some(StaffRow {
        user_id: account.user_id.clone(),
        password: account.password.clone(),
        name: account.name.clone(),
        role: user.role(),
        gender: account.gender.clone(),
        age,
        email: account.email.clone(),
        phone: account.phone.clone(),
        specialisation: user.as_doctor().map(|d| d.specialisation.clone()),
    })
}

impl From<OutcomeRow> for Outcome {
    fn from(row: OutcomeRow) -> Self {
        Outcome {
            outcome_id: row.outcome_id,
            appointment_id: row.appointment_id,
            date: row.date,
            service_provided: row.service_provided,
            prescription_ids: row
                .prescription_ids
                .split(LIST_SEPARATOR)
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect(),
            consultation_notes: row.consultation_notes,
        }
    }
}

impl From<&Outcome> for OutcomeRow {
    fn from(outcome: &Outcome) -> Self {
        OutcomeRow {
            outcome_id: outcome.outcome_id.clone(),
            appointment_id: outcome.appointment_id.clone(),
            date: outcome.date,
            service_provided: outcome.service_provided.clone(),
            prescription_ids: outcome.prescription_ids.join(&LIST_SEPARATOR.to_string()),
            consultation_notes: outcome.consultation_notes.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CsvStorage {
    data_dir: PathBuf,
}

impl CsvStorage {
    pub fn new(data_dir: &Path) -> Self {
        CsvStorage {
            data_dir: data_dir.to_path_buf(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }

    /// True when at least one entity file already exists.
    pub fn has_data(&self) -> bool {
        DATA_FILES.iter().any(|file| self.path(file).exists())
    }

    fn staging_path(&self, file: &str) -> PathBuf {
        self.path(file).with_extension("csv.tmp")
    }

    fn stage_all(&self, store: &ClinicStore) -> ClinicResult<()> {
        stage_rows(
            &self.staging_path(PATIENTS_FILE),
            PATIENT_HEADERS,
            store.users.iter().filter_map(User::as_patient).map(patient_row),
        )?;
        stage_rows(
            &self.staging_path(STAFF_FILE),
            STAFF_HEADERS,
            store.users.iter().filter_map(staff_row),
        )?;
        stage_rows(&self.staging_path(SLOTS_FILE), SLOT_HEADERS, store.slots.iter())?;
        stage_rows(&self.staging_path(APPOINTMENTS_FILE), APPOINTMENT_HEADERS, store.appointments.iter())?;
        stage_rows(
            &self.staging_path(OUTCOMES_FILE),
            OUTCOME_HEADERS,
            store.outcomes.iter().map(OutcomeRow::from),
        )?;
        stage_rows(&self.staging_path(PRESCRIPTIONS_FILE), PRESCRIPTION_HEADERS, store.prescriptions.iter())?;
        stage_rows(&self.staging_path(MEDICATIONS_FILE), MEDICATION_HEADERS, store.medications.iter())?;
        stage_rows(&self.staging_path(REQUESTS_FILE), REQUEST_HEADERS, store.requests.iter())?;
        Ok(())
    }

    fn discard_staged(&self) {
        for file in DATA_FILES {
            let staged = self.staging_path(file);
            if staged.is_file() {
                if let Err(e) = fs::remove_file(&staged) {
                    warn!("Could not remove {}: {}", staged.display(), e);
                }
            }
        }
    }
}

fn read_rows<R: DeserializeOwned>(path: &Path) -> ClinicResult<Vec<R>> {
    if !path.exists() {
        warn!("{} does not exist, starting with an empty collection", path.display());
        return Ok(Vec::new());
    }
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_path(path)?;
    let rows = reader
        .deserialize()
        .collect::<Result<Vec<R>, csv::Error>>()
        .map_err(|e| ClinicError::Storage(format!("failed to read {}: {}", path.display(), e)))?;
    debug!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

fn stage_rows<R, I>(tmp_path: &Path, headers: &[&str], rows: I) -> ClinicResult<()>
where
    R: Serialize,
    I: IntoIterator<Item = R>,
{
    let mut writer = WriterBuilder::new().has_headers(false).from_path(tmp_path)?;
    writer.write_record(headers)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

impl StorageEngine for CsvStorage {
    fn load(&self) -> ClinicResult<ClinicStore> {
        info!("Loading clinic data from {}", self.data_dir.display());

        let mut users: Vec<User> = read_rows::<PatientRow>(&self.path(PATIENTS_FILE))?
            .into_iter()
            .map(User::from)
            .collect();
        for row in read_rows::<StaffRow>(&self.path(STAFF_FILE))? {
            users.push(User::try_from(row)?);
        }
        let outcomes = read_rows::<OutcomeRow>(&self.path(OUTCOMES_FILE))?
            .into_iter()
            .map(Outcome::from)
            .collect();

        let store = ClinicStore {
            users: Collection::from_vec(users)?,
            slots: Collection::from_vec(read_rows(&self.path(SLOTS_FILE))?)?,
            appointments: Collection::from_vec(read_rows(&self.path(APPOINTMENTS_FILE))?)?,
            outcomes: Collection::from_vec(outcomes)?,
            prescriptions: Collection::from_vec(read_rows(&self.path(PRESCRIPTIONS_FILE))?)?,
            medications: Collection::from_vec(read_rows(&self.path(MEDICATIONS_FILE))?)?,
            requests: Collection::from_vec(read_rows(&self.path(REQUESTS_FILE))?)?,
        };
        info!("Loaded {}", store.summary());
        Ok(store)
    }

    fn save(&self, store: &ClinicStore) -> ClinicResult<()> {
        fs::create_dir_all(&self.data_dir)?;

        if let Err(e) = self.stage_all(store) {
            warn!("Save to {} aborted, data files left unchanged: {}", self.data_dir.display(), e);
            self.discard_staged();
            return Err(e);
        }
        for file in DATA_FILES {
            fs::rename(self.staging_path(file), self.path(file))?;
        }

        debug!("Saved {} to {}", store.summary(), self.data_dir.display());
        Ok(())
    }

    fn get_type(&self) -> &'static str {
        "csv"
    }
}
