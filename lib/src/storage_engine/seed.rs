// lib/src/storage_engine/seed.rs
//! A small sample clinic used by `clinic seed` and by tests.

use chrono::{Days, NaiveDate, NaiveTime};
use log::{info, warn};

use models::identifiers::{format_id, SLOT_PREFIX};
use models::{
    Account, Administrator, ClinicError, ClinicResult, Doctor, Medication, Patient, Pharmacist,
    Slot, SlotStatus, User,
};

use crate::storage_engine::{ClinicStore, Collection, StorageEngine};

const SLOT_TIMES: &[(u32, u32)] = &[(9, 0), (9, 30), (10, 0), (14, 0)];
const SLOT_LENGTH_MINUTES: u32 = 30;
const SEED_DAYS: u64 = 3;

fn time(hour: u32, minute: u32) -> ClinicResult<NaiveTime> {
    NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or_else(|| ClinicError::InvalidArgument(format!("invalid time {:02}:{:02}", hour, minute)))
}

fn date(year: i32, month: u32, day: u32) -> ClinicResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| ClinicError::InvalidArgument(format!("invalid date {}-{}-{}", year, month, day)))
}

fn sample_users(password: &str) -> ClinicResult<Vec<User>> {
    let patient = |id: &str, name: &str, gender: &str, dob: NaiveDate, blood: &str| {
        User::Patient(Patient {
            account: Account::new(id, password, name, gender),
            date_of_birth: dob,
            blood_type: blood.to_string(),
        })
    };
    let doctor = |id: &str, name: &str, gender: &str, age: u32, specialisation: &str| {
        User::Doctor(Doctor {
            account: Account::new(id, password, name, gender),
            age,
            specialisation: specialisation.to_string(),
        })
    };

    Ok(vec![
        patient("P1001", "Alice Brown", "Female", date(1980, 5, 14)?, "A+"),
        patient("P1002", "Bob Stone", "Male", date(1975, 11, 22)?, "B+"),
        patient("P1003", "Charlie White", "Male", date(1990, 7, 8)?, "O-"),
        doctor("D0001", "John Smith", "Male", 45, "General Practice"),
        doctor("D0002", "Emily Clarke", "Female", 38, "Cardiology"),
        User::Pharmacist(Pharmacist {
            account: Account::new("PH0001", password, "Mark Lee", "Male"),
            age: 29,
        }),
        User::Administrator(Administrator {
            account: Account::new("A0001", password, "Sarah Lee", "Female"),
            age: 40,
        }),
    ])
}

fn sample_medications() -> Vec<Medication> {
    [
        ("M0001", "Paracetamol", 100, 20),
        ("M0002", "Ibuprofen", 50, 10),
        ("M0003", "Amoxicillin", 75, 15),
        ("M0004", "Salbutamol", 8, 10),
    ]
    .into_iter()
    .map(|(id, name, stock, alert)| Medication {
        medication_id: id.to_string(),
        name: name.to_string(),
        stock_level: stock,
        low_stock_alert_level: alert,
    })
    .collect()
}

fn sample_slots(doctor_ids: &[&str], first_day: NaiveDate) -> ClinicResult<Vec<Slot>> {
    let mut slots = Vec::new();
    for doctor_id in doctor_ids {
        for offset in 0..SEED_DAYS {
            let day = first_day
                .checked_add_days(Days::new(offset))
                .ok_or_else(|| ClinicError::InvalidArgument(format!("{} is out of range", first_day)))?;
            for (hour, minute) in SLOT_TIMES {
                let start = time(*hour, *minute)?;
                let end = time(*hour + (*minute + SLOT_LENGTH_MINUTES) / 60, (*minute + SLOT_LENGTH_MINUTES) % 60)?;
                slots.push(Slot {
                    slot_id: format_id(SLOT_PREFIX, slots.len() as u32 + 1),
                    doctor_id: doctor_id.to_string(),
                    date: day,
                    start_time: start,
                    end_time: end,
                    status: SlotStatus::Available,
                });
            }
        }
    }
    Ok(slots)
}

/// Builds the sample clinic. Every account gets `default_password`, and
/// slots start on `first_day`.
pub fn sample_store(default_password: &str, first_day: NaiveDate) -> ClinicResult<ClinicStore> {
    let users = sample_users(default_password)?;
    let doctor_ids: Vec<&str> = users
        .iter()
        .filter_map(User::as_doctor)
        .map(|d| d.account.user_id.as_str())
        .collect();
    let slots = sample_slots(&doctor_ids, first_day)?;

    Ok(ClinicStore {
        slots: Collection::from_vec(slots)?,
        users: Collection::from_vec(users)?,
        medications: Collection::from_vec(sample_medications())?,
        ..ClinicStore::default()
    })
}

/// Saves the sample clinic unless the storage already holds users.
/// Returns whether anything was written.
pub fn seed_storage(
    storage: &dyn StorageEngine,
    default_password: &str,
    first_day: NaiveDate,
    force: bool,
) -> ClinicResult<bool> {
    let existing = storage.load()?;
    if !existing.users.is_empty() && !force {
        warn!(
            "{} storage already holds {} users; not seeding without --force",
            storage.get_type(),
            existing.users.len()
        );
        return Ok(false);
    }
    let store = sample_store(default_password, first_day)?;
    storage.save(&store)?;
    info!("Seeded {} storage with {}", storage.get_type(), store.summary());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage_engine::InMemoryStorage;
    use models::Role;

    fn first_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
    }

    #[test]
    fn sample_store_covers_every_role() {
        let store = sample_store("password", first_day()).unwrap();
        for role in [Role::Patient, Role::Doctor, Role::Pharmacist, Role::Administrator] {
            assert!(store.users.iter().any(|u| u.role() == role), "no {} seeded", role);
        }
        assert!(store.users.iter().all(|u| u.account().password == "password"));
        assert_eq!(store.slots.len(), 2 * SEED_DAYS as usize * SLOT_TIMES.len());
        assert!(store.slots.iter().all(Slot::is_available));
        assert_eq!(store.slots.next_id(SLOT_PREFIX).unwrap(), "SL0025");
    }

    #[test]
    fn sample_slots_do_not_overlap() {
        let store = sample_store("password", first_day()).unwrap();
        let slots = store.slots.list();
        for (i, a) in slots.iter().enumerate() {
            for b in &slots[i + 1..] {
                assert!(a.doctor_id != b.doctor_id || !a.overlaps(b), "{} overlaps {}", a.slot_id, b.slot_id);
            }
        }
    }

    #[test]
    fn seeding_refuses_to_overwrite_without_force() {
        let storage = InMemoryStorage::new();
        assert!(seed_storage(&storage, "password", first_day(), false).unwrap());
        assert!(!seed_storage(&storage, "changed", first_day(), false).unwrap());
        assert_eq!(
            storage.load().unwrap().users.find("A0001").unwrap().account().password,
            "password"
        );

        assert!(seed_storage(&storage, "changed", first_day(), true).unwrap());
        assert_eq!(
            storage.load().unwrap().users.find("A0001").unwrap().account().password,
            "changed"
        );
    }
}
