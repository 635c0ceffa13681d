#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use chrono::{DateTime, TimeDelta, Utc};

use regdash_core::model::{NewRegistration, RegistrationStatus, RegistrationsQuery};
use regdash_core::{resolve_range, DateRange, RangeKey, WeekStart};
use regdash_server::source::{MemoryBackend, MetricsSource, RegistrationsSource};

fn at(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().to_utc()
}

fn row(name: &str, step: u32, created_at: &str) -> NewRegistration {
    NewRegistration {
        full_name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        current_step: step,
        answers: Default::default(),
        created_at: Some(at(created_at)),
    }
}

fn last7() -> DateRange {
    let now = DateTime::parse_from_rfc3339("2024-01-15T12:00:00Z").unwrap();
    resolve_range(RangeKey::Last7Days, now, WeekStart::Monday)
}

fn backend() -> MemoryBackend {
    let b = MemoryBackend::new(4, 50);
    b.seed(row("Old", 4, "2023-12-01T10:00:00Z")).unwrap();
    b.seed(row("Ada", 4, "2024-01-09T10:00:00Z")).unwrap();
    b.seed(row("Grace", 2, "2024-01-10T10:00:00Z")).unwrap();
    b.seed(row("Alan", 4, "2024-01-12T10:00:00Z")).unwrap();
    b.seed(row("Edsger", 1, "2024-01-14T10:00:00Z")).unwrap();
    b
}

#[test]
fn seed_derives_status_and_normalizes() {
    let b = MemoryBackend::new(4, 50);
    let mut new = row("Ada", 4, "2024-01-09T10:00:00Z");
    new.email = "  Ada@Example.COM ".into();
    let r = b.seed(new).unwrap();
    assert_eq!(r.id, 1);
    assert_eq!(r.email, "ada@example.com");
    assert_eq!(r.status, RegistrationStatus::Completed);
    assert_eq!(r.created_at, at("2024-01-09T10:00:00Z"));

    let r = b.seed(row("Grace", 2, "2024-01-10T10:00:00Z")).unwrap();
    assert_eq!(r.id, 2);
    assert_eq!(r.status, RegistrationStatus::InProgress);
}

#[test]
fn submit_stamps_now_and_validates() {
    let b = MemoryBackend::new(4, 50);
    assert!(b.is_empty());
    let before = Utc::now();
    let r = b.submit(row("Ada", 1, "2001-01-01T00:00:00Z")).unwrap();
    assert!(r.created_at >= before);
    assert!(r.created_at <= Utc::now() + TimeDelta::seconds(1));

    let err = b.submit(row("Ada", 9, "2001-01-01T00:00:00Z")).unwrap_err();
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
    assert_eq!(b.len(), 1);
    assert!(!b.is_empty());
}

#[tokio::test]
async fn metrics_for_window() {
    let m = backend().dashboard_metrics(last7()).await.unwrap();
    assert_eq!(m.total_registrations, 5);
    assert_eq!(m.new_registrations, 4);
    assert_eq!(m.completed, 2);
    assert_eq!(m.in_progress, 2);
    assert!((m.completion_rate - 0.5).abs() < f64::EPSILON);
    assert_eq!(m.range, last7());
}

#[tokio::test]
async fn empty_window_has_zero_rate() {
    let now = DateTime::parse_from_rfc3339("2030-01-15T12:00:00Z").unwrap();
    let range = resolve_range(RangeKey::ThisWeek, now, WeekStart::Monday);
    let m = backend().dashboard_metrics(range).await.unwrap();
    assert_eq!(m.new_registrations, 0);
    assert_eq!(m.completion_rate, 0.0);
}

#[tokio::test]
async fn pages_newest_first() {
    let b = backend();

    let q = RegistrationsQuery { page: 1, limit: 3, date_range: last7() };
    let page = b.registrations(q).await.unwrap();
    assert_eq!(page.total, 4);
    assert_eq!((page.page, page.limit), (1, 3));
    let names: Vec<_> = page.items.iter().map(|r| r.full_name.as_str()).collect();
    assert_eq!(names, ["Edsger", "Alan", "Grace"]);

    let q = RegistrationsQuery { page: 2, limit: 3, date_range: last7() };
    let page = b.registrations(q).await.unwrap();
    let names: Vec<_> = page.items.iter().map(|r| r.full_name.as_str()).collect();
    assert_eq!(names, ["Ada"]);

    let q = RegistrationsQuery { page: 9, limit: 3, date_range: last7() };
    let page = b.registrations(q).await.unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total, 4);
}

#[tokio::test]
async fn paging_bounds() {
    let b = backend();
    for (page, limit) in [(0, 10), (1, 0), (1, 51)] {
        let q = RegistrationsQuery { page, limit, date_range: last7() };
        let err = b.registrations(q).await.unwrap_err();
        assert_eq!(err.client_code().as_str(), "BAD_REQUEST", "page={page} limit={limit}");
    }
}
