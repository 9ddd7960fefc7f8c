// medical_knowledge/src/clinical_workflow/staff.rs
//! Staff accounts and contact details.

use log::info;

use models::{
    non_empty, Account, Administrator, AppointmentStatus, ClinicError, ClinicResult, Doctor,
    Pharmacist, Role, SlotStatus, User,
};

use crate::clinical_workflow::ClinicWorkflow;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStaff {
    pub role: Role,
    pub name: String,
    pub gender: String,
    pub age: u32,
    pub specialisation: Option<String>,
}

impl ClinicWorkflow {
    /// Doctors, pharmacists and administrators, optionally of one role.
    pub fn staff(&self, role: Option<Role>) -> Vec<&User> {
        let mut staff = self
            .store
            .users
            .filter(|u| u.role().is_staff() && role.map_or(true, |r| u.role() == r));
        staff.sort_by(|a, b| a.role().as_str().cmp(b.role().as_str()).then_with(|| a.user_id().cmp(b.user_id())));
        staff
    }

    /// Creates a staff account with the next id for its role and the given
    /// initial password.
    pub fn add_staff(&mut self, new: NewStaff, initial_password: &str) -> ClinicResult<User> {
        let name = non_empty("name", &new.name)?;
        let gender = non_empty("gender", &new.gender)?;
        let user_id = self.store.users.next_id(new.role.id_prefix())?;
        let account = Account::new(&user_id, initial_password, &name, &gender);
        let user = match new.role {
            Role::Doctor => {
                let specialisation = new
                    .specialisation
                    .as_deref()
                    .map(|s| non_empty("specialisation", s))
                    .transpose()?
                    .ok_or_else(|| ClinicError::InvalidArgument("doctors need a specialisation".to_string()))?;
                User::Doctor(Doctor {
                    account,
                    age: new.age,
                    specialisation,
                })
            }
            Role::Pharmacist => User::Pharmacist(Pharmacist { account, age: new.age }),
            Role::Administrator => User::Administrator(Administrator { account, age: new.age }),
            Role::Patient => {
                return Err(ClinicError::InvalidArgument(format!("{} is not a staff role", new.role)));
            }
        };
        self.store.users.add(user.clone())?;
        info!("Added {} {} ({})", user.role(), user.user_id(), user.name());
        Ok(user)
    }

    /// Deletes a staff account. Administrators cannot remove themselves and
    /// doctors with open appointments cannot be removed. A removed doctor's
    /// `AVAILABLE` slots become `REMOVED`.
    pub fn remove_staff(&mut self, user_id: &str, acting_admin: &str) -> ClinicResult<User> {
        let user = self.store.users.find(user_id)?;
        if !user.role().is_staff() {
            return Err(ClinicError::InvalidArgument(format!("{} is not a staff member", user_id)));
        }
        if user_id == acting_admin {
            return Err(ClinicError::InvalidState("administrators cannot remove their own account".to_string()));
        }
        if let Some(open) = self.store.appointments.iter().find(|a| {
            a.doctor_id == user_id
                && matches!(a.status, AppointmentStatus::Requested | AppointmentStatus::Confirmed)
        }) {
            return Err(ClinicError::InvalidState(format!(
                "{} still has open appointment {}",
                user_id, open.appointment_id
            )));
        }
        let open_slots: Vec<usize> = (0..self.store.slots.len())
            .filter(|&i| {
                let slot = self.store.slots.at(i);
                slot.doctor_id == user_id && slot.status == SlotStatus::Available
            })
            .collect();

        let removed = self.store.users.remove(user_id)?;
        for &i in &open_slots {
            self.store.slots.at_mut(i).status = SlotStatus::Removed;
        }
        info!(
            "{} removed {} {} and withdrew {} available slots",
            acting_admin,
            removed.role(),
            user_id,
            open_slots.len()
        );
        Ok(removed)
    }

    /// Changes a staff member's name and contact details. Nothing changes
    /// unless every given field is valid.
    pub fn update_staff(
        &mut self,
        user_id: &str,
        name: Option<&str>,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> ClinicResult<User> {
        let index = self.store.users.position(user_id)?;
        if !self.store.users.at(index).role().is_staff() {
            return Err(ClinicError::InvalidArgument(format!("{} is not a staff member", user_id)));
        }
        self.update_account(index, name, email, phone)
    }

    /// Changes any user's own email and phone.
    pub fn update_contact(&mut self, user_id: &str, email: Option<&str>, phone: Option<&str>) -> ClinicResult<User> {
        let index = self.store.users.position(user_id)?;
        self.update_account(index, None, email, phone)
    }

    fn update_account(
        &mut self,
        index: usize,
        name: Option<&str>,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> ClinicResult<User> {
        let mut account = self.store.users.at(index).account().clone();
        if let Some(name) = name {
            account.name = non_empty("name", name)?;
        }
        account.update_contact(email, phone)?;

        let user = self.store.users.at_mut(index);
        *user.account_mut() = account;
        info!("Updated account {}", user.user_id());
        Ok(user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clinical_workflow::test_support::workflow;
    use models::ErrorKind;
    use pretty_assertions::assert_eq;

    fn new_staff(role: Role, specialisation: Option<&str>) -> NewStaff {
        NewStaff {
            role,
            name: "Tom Hill".to_string(),
            gender: "Male".to_string(),
            age: 33,
            specialisation: specialisation.map(str::to_string),
        }
    }

    #[test]
    fn add_staff_uses_role_prefix() {
        let mut wf = workflow();
        let doctor = wf.add_staff(new_staff(Role::Doctor, Some("Dermatology")), "password").unwrap();
        assert_eq!(doctor.user_id(), "D0003");
        let pharmacist = wf.add_staff(new_staff(Role::Pharmacist, None), "password").unwrap();
        assert_eq!(pharmacist.user_id(), "PH0002");
        let admin = wf.add_staff(new_staff(Role::Administrator, None), "password").unwrap();
        assert_eq!(admin.user_id(), "A0002");
    }

    #[test]
    fn add_staff_validates_role_and_specialisation() {
        let mut wf = workflow();
        let before = wf.clone();
        assert_eq!(
            wf.add_staff(new_staff(Role::Patient, None), "password").unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            wf.add_staff(new_staff(Role::Doctor, None), "password").unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(wf, before);
    }

    #[test]
    fn remove_staff_guards() {
        let mut wf = workflow();
        assert_eq!(wf.remove_staff("A0001", "A0001").unwrap_err().kind(), ErrorKind::InvalidState);
        assert_eq!(wf.remove_staff("P1001", "A0001").unwrap_err().kind(), ErrorKind::InvalidArgument);

        wf.request_appointment("P1001", "D0001", "SL0001").unwrap();
        assert_eq!(wf.remove_staff("D0001", "A0001").unwrap_err().kind(), ErrorKind::InvalidState);
        assert_eq!(wf.remove_staff("D0002", "A0001").unwrap().user_id(), "D0002");
        assert_eq!(wf.staff(Some(Role::Doctor)).len(), 1);
    }

    #[test]
    fn removed_doctor_slots_are_withdrawn() {
        let mut wf = workflow();
        assert_eq!(wf.available_slots(Some("D0002")).len(), 12);
        wf.remove_staff("D0002", "A0001").unwrap();

        assert!(wf.available_slots(None).iter().all(|s| s.doctor_id == "D0001"));
        assert_eq!(wf.store().slots.find("SL0013").unwrap().status, SlotStatus::Removed);
        assert_eq!(wf.store().slots.find("SL0001").unwrap().status, SlotStatus::Available);
    }

    #[test]
    fn update_is_all_or_nothing() {
        let mut wf = workflow();
        let err = wf
            .update_staff("PH0001", Some("Mark Leigh"), Some("no-at-sign"), None)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(wf.users().find("PH0001").unwrap().name(), "Mark Lee");

        let updated = wf
            .update_staff("PH0001", Some("Mark Leigh"), Some("mark@clinic.org"), Some("555-0101"))
            .unwrap();
        assert_eq!(updated.name(), "Mark Leigh");
        assert_eq!(updated.account().email.as_deref(), Some("mark@clinic.org"));
        assert_eq!(wf.update_staff("P1001", Some("X"), None, None).unwrap_err().kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn patients_update_their_contact() {
        let mut wf = workflow();
        let updated = wf.update_contact("P1001", None, Some("91234567")).unwrap();
        assert_eq!(updated.account().phone.as_deref(), Some("91234567"));
        assert_eq!(wf.update_contact("P1001", Some(""), None).unwrap_err().kind(), ErrorKind::InvalidArgument);
    }
}
