use super::Repository;
use crate::models::{Notice, NoticeFields, Role};
use crate::store::StoreError;

impl Repository<'_, NoticeFields> {
    /// Notices addressed to `role` (directly or via `all`), newest first.
    /// Undated notices sort last.
    pub fn feed_for(&self, role: Role) -> Result<Vec<Notice>, StoreError> {
        let mut notices = self.find(|n| n.fields.reaches(role))?;
        notices.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notices)
    }
}
