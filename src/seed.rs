//! Demo fixtures so the four role logins always work on a fresh workspace.
//!
//! Each collection is seeded only when its key is absent, so an emptied
//! collection stays empty and a partial workspace only gets what it lacks.

use chrono::{TimeZone, Utc};
use serde::Serialize;

use crate::models::{
    Audience, FeeFields, NoticeFields, Priority, Record, Role, StudentFields, UserFields,
};
use crate::store::{write_collection, Collection, KeyValueStore, StoreError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub users: bool,
    pub students: bool,
    pub notices: bool,
    pub fees: bool,
}

fn s(v: &str) -> String {
    v.to_string()
}

fn record<F>(id: &str, fields: F) -> Record<F> {
    Record {
        id: s(id),
        fields,
        created_at: None,
    }
}

fn user(
    id: &str,
    email: &str,
    password: &str,
    role: Role,
    name: &str,
    phone: &str,
) -> Record<UserFields> {
    record(
        id,
        UserFields {
            email: s(email),
            password: s(password),
            role,
            name: s(name),
            phone: Some(s(phone)),
            subject: None,
            student_id: None,
            class: None,
            parent_email: None,
            student_email: None,
        },
    )
}

pub fn demo_users() -> Vec<Record<UserFields>> {
    let admin = user(
        "1",
        "admin@school.com",
        "admin123",
        Role::Admin,
        "Admin User",
        "123-456-7890",
    );

    let mut teacher = user(
        "2",
        "teacher@school.com",
        "teacher123",
        Role::Teacher,
        "John Teacher",
        "123-456-7891",
    );
    teacher.fields.subject = Some(s("Mathematics"));

    let mut student = user(
        "3",
        "student@school.com",
        "student123",
        Role::Student,
        "Alice Student",
        "123-456-7892",
    );
    student.fields.student_id = Some(s("STU001"));
    student.fields.class = Some(s("Grade 10"));
    student.fields.parent_email = Some(s("parent@school.com"));

    let mut parent = user(
        "4",
        "parent@school.com",
        "parent123",
        Role::Parent,
        "Bob Parent",
        "123-456-7893",
    );
    parent.fields.student_email = Some(s("student@school.com"));

    vec![admin, teacher, student, parent]
}

pub fn demo_students() -> Vec<Record<StudentFields>> {
    vec![
        record(
            "1",
            StudentFields {
                name: s("Alice Student"),
                email: s("student@school.com"),
                student_id: s("STU001"),
                class: s("Grade 10"),
                phone: Some(s("123-456-7892")),
                address: Some(s("123 Main St, City")),
                parent_name: Some(s("Bob Parent")),
                parent_email: Some(s("parent@school.com")),
                parent_phone: Some(s("123-456-7893")),
                date_of_birth: Some(s("2008-05-15")),
                admission_date: Some(s("2023-09-01")),
            },
        ),
        record(
            "2",
            StudentFields {
                name: s("Charlie Brown"),
                email: s("charlie@school.com"),
                student_id: s("STU002"),
                class: s("Grade 9"),
                phone: Some(s("123-456-7894")),
                address: Some(s("456 Oak Ave, City")),
                parent_name: Some(s("Jane Brown")),
                parent_email: Some(s("jane@school.com")),
                parent_phone: Some(s("123-456-7895")),
                date_of_birth: Some(s("2009-03-22")),
                admission_date: Some(s("2023-09-01")),
            },
        ),
    ]
}

pub fn demo_notices() -> Vec<Record<NoticeFields>> {
    vec![
        record(
            "1",
            NoticeFields {
                title: s("School Holiday Notice"),
                content: s("School will be closed on December 25th for Christmas holiday."),
                priority: Priority::High,
                target_roles: vec![Audience::All],
                created_by: Some(s("1")),
                created_by_name: None,
            },
        ),
        record(
            "2",
            NoticeFields {
                title: s("Parent-Teacher Meeting"),
                content: s("Parent-teacher meeting scheduled for next Friday at 2 PM."),
                priority: Priority::Medium,
                target_roles: vec![Audience::Parent, Audience::Teacher],
                created_by: Some(s("1")),
                created_by_name: None,
            },
        ),
    ]
}

pub fn demo_fees() -> Vec<Record<FeeFields>> {
    vec![
        record(
            "1",
            FeeFields {
                student_id: s("1"),
                student_name: s("Alice Student"),
                description: s("Monthly Tuition Fee"),
                amount: 500.0,
                due_date: s("2024-01-15"),
                is_paid: false,
                paid_at: None,
            },
        ),
        record(
            "2",
            FeeFields {
                student_id: s("2"),
                student_name: s("Charlie Brown"),
                description: s("Monthly Tuition Fee"),
                amount: 500.0,
                due_date: s("2024-01-15"),
                is_paid: true,
                paid_at: Utc.with_ymd_and_hms(2024, 1, 10, 10, 30, 0).single(),
            },
        ),
    ]
}

fn seed_if_absent<T: Serialize>(
    store: &mut dyn KeyValueStore,
    collection: Collection,
    fixtures: Vec<T>,
) -> Result<bool, StoreError> {
    if store.contains(collection.key())? {
        return Ok(false);
    }
    write_collection(store, collection, &fixtures)?;
    tracing::info!(key = collection.key(), count = fixtures.len(), "seeded demo data");
    Ok(true)
}

pub fn seed_demo_data(store: &mut dyn KeyValueStore) -> Result<SeedSummary, StoreError> {
    Ok(SeedSummary {
        users: seed_if_absent(store, Collection::Users, demo_users())?,
        students: seed_if_absent(store, Collection::Students, demo_students())?,
        notices: seed_if_absent(store, Collection::Notices, demo_notices())?,
        fees: seed_if_absent(store, Collection::Fees, demo_fees())?,
    })
}
