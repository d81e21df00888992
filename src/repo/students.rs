use super::Repository;
use crate::models::{Role, Student, StudentFields, User};
use crate::store::StoreError;

impl Repository<'_, StudentFields> {
    pub fn by_class(&self, class: &str) -> Result<Vec<Student>, StoreError> {
        self.find(|s| s.fields.class == class)
    }

    /// The student a portal user sees: matched on `email` for students and
    /// on `parentEmail` for parents. Staff have no linked student.
    pub fn linked_to(&self, email: &str, role: Role) -> Result<Option<Student>, StoreError> {
        let students = self.list_all()?;
        let linked = match role {
            Role::Student => students.into_iter().find(|s| s.fields.email == email),
            Role::Parent => students
                .into_iter()
                .find(|s| s.fields.parent_email.as_deref() == Some(email)),
            Role::Admin | Role::Teacher => None,
        };
        Ok(linked)
    }

    pub fn linked_to_user(&self, user: &User) -> Result<Option<Student>, StoreError> {
        self.linked_to(&user.fields.email, user.fields.role)
    }
}
