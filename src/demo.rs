// SPDX-License-Identifier: MIT

//! Demo hierarchy: one admin, one team leader, two managers with three
//! callers each. Used to seed an empty store (env-gated) and by tests.

use crate::models::{Lead, LeadSource, LeadStatus, LeadType, Role, ServiceType, User};

fn demo_user(
    id: &str,
    name: &str,
    email: &str,
    phone: &str,
    password: &str,
    role: Role,
    reporting_to: Option<&str>,
) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        password: password.to_string(),
        role,
        reporting_to: reporting_to.map(str::to_string),
        is_active: true,
        created_at: "2024-01-01T00:00:00Z".to_string(),
    }
}

/// The full demo org chart.
pub fn demo_users() -> Vec<User> {
    vec![
        demo_user(
            "admin-001",
            "Sanjay Kapoor",
            "admin@crm.com",
            "+91 98765 00000",
            "admin123",
            Role::Admin,
            None,
        ),
        demo_user(
            "tl-001",
            "Rajesh Kumar",
            "tl@crm.com",
            "+91 98765 43210",
            "tl123",
            Role::TeamLeader,
            None,
        ),
        demo_user(
            "mgr-001",
            "Priya Sharma",
            "manager1@crm.com",
            "+91 98765 43211",
            "manager123",
            Role::Manager,
            Some("tl-001"),
        ),
        demo_user(
            "mgr-002",
            "Amit Patel",
            "manager2@crm.com",
            "+91 98765 43212",
            "manager123",
            Role::Manager,
            Some("tl-001"),
        ),
        demo_user(
            "clr-001",
            "Neha Gupta",
            "caller1@crm.com",
            "+91 98765 43213",
            "caller123",
            Role::Caller,
            Some("mgr-001"),
        ),
        demo_user(
            "clr-002",
            "Vikram Singh",
            "caller2@crm.com",
            "+91 98765 43214",
            "caller123",
            Role::Caller,
            Some("mgr-001"),
        ),
        demo_user(
            "clr-003",
            "Anita Desai",
            "caller3@crm.com",
            "+91 98765 43215",
            "caller123",
            Role::Caller,
            Some("mgr-001"),
        ),
        demo_user(
            "clr-004",
            "Rahul Verma",
            "caller4@crm.com",
            "+91 98765 43216",
            "caller123",
            Role::Caller,
            Some("mgr-002"),
        ),
        demo_user(
            "clr-005",
            "Sneha Reddy",
            "caller5@crm.com",
            "+91 98765 43217",
            "caller123",
            Role::Caller,
            Some("mgr-002"),
        ),
        demo_user(
            "clr-006",
            "Karan Mehta",
            "caller6@crm.com",
            "+91 98765 43218",
            "caller123",
            Role::Caller,
            Some("mgr-002"),
        ),
    ]
}

/// A freshly-created lead owned by `creator_id`: status `new`, empty
/// logs, thread seeded with the creator.
pub fn demo_lead(creator_id: &str) -> Lead {
    let creator = demo_users()
        .into_iter()
        .find(|u| u.id == creator_id)
        .unwrap_or_else(|| panic!("unknown demo user {creator_id}"));

    Lead {
        id: crate::ids::fresh_id(),
        name: "Acme Corp".to_string(),
        number: "+91 90000 00001".to_string(),
        email: "contact@acme.example".to_string(),
        city: "Pune".to_string(),
        lead_type: LeadType::Warm,
        source: LeadSource::GoogleAds,
        service: ServiceType::Website,
        notes: String::new(),
        status: LeadStatus::New,
        comments: Vec::new(),
        reminders: Vec::new(),
        created_at: "2024-04-01T10:00:00Z".to_string(),
        created_by: Some(creator.id.clone()),
        created_by_name: Some(creator.name.clone()),
        assigned_to: Some(creator.id.clone()),
        assigned_to_name: Some(creator.name),
        assignment_history: Vec::new(),
        team_thread: vec![creator.id],
    }
}
