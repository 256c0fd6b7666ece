use std::str::FromStr;

use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::application::{
    catalog::{CatalogQuery, CatalogSort},
    change_password::ChangePasswordInput,
    course_admin::NewCourseInput,
    register::RegisterInput,
};
use crate::domain::entity::{course::Course, user::User};
use crate::domain::repository::{CourseRepository, UserRepository};
use crate::domain::value_object::{
    course_name::CourseName,
    email::Email,
    money::Money,
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
    user_role::UserRole,
};
use crate::{ErrorKind, MIGRATOR, MarketplaceConfig, MarketplaceService, Session, SqliteStore};

const PASSWORD: &str = "secret1";

async fn store() -> SqliteStore {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);

    // One connection that never expires, so the in-memory database survives
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap();

    MIGRATOR.run(&pool).await.unwrap();
    SqliteStore::new(pool)
}

async fn service() -> MarketplaceService<SqliteStore> {
    MarketplaceService::new(store().await, MarketplaceConfig::for_tests())
}

fn registration(user_name: &str, email: &str) -> RegisterInput {
    RegisterInput {
        user_name: user_name.to_string(),
        email: email.to_string(),
        password: PASSWORD.to_string(),
        repeat_password: PASSWORD.to_string(),
        accepted_terms: true,
    }
}

async fn register(service: &MarketplaceService<SqliteStore>, user_name: &str, email: &str) -> User {
    service.register(registration(user_name, email)).await.unwrap()
}

async fn sign_in(service: &MarketplaceService<SqliteStore>, email: &str) -> Session {
    service.authenticate(email, PASSWORD.to_string()).await.unwrap()
}

async fn admin(service: &MarketplaceService<SqliteStore>) -> Session {
    service
        .seed_admin(
            "admin".to_string(),
            "admin@x.com".to_string(),
            PASSWORD.to_string(),
        )
        .await
        .unwrap();
    sign_in(service, "admin@x.com").await
}

async fn add_course(
    service: &MarketplaceService<SqliteStore>,
    admin: &Session,
    name: &str,
    price: &str,
) -> Course {
    service
        .add_course(
            admin,
            NewCourseInput {
                name: name.to_string(),
                description: "Hands-on lessons".to_string(),
                price: price.to_string(),
                link: "https://courses.example.com".to_string(),
            },
        )
        .await
        .unwrap()
}

async fn stored_user(service: &MarketplaceService<SqliteStore>, email: &str) -> Option<User> {
    let email = Email::new(email).unwrap();
    UserRepository::find_by_email(service.store(), &email)
        .await
        .unwrap()
}

async fn enrollment_rows(service: &MarketplaceService<SqliteStore>) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM user_courses")
        .fetch_one(service.store().pool())
        .await
        .unwrap()
}

// ============================================================================
// Accounts
// ============================================================================

#[tokio::test]
async fn test_alice_buys_a_course_after_top_up() {
    let service = service().await;
    let admin = admin(&service).await;
    let course = add_course(&service, &admin, "Rust Basics", "20").await;

    let alice = register(&service, "alice", "alice@x.com").await;
    let session = sign_in(&service, "alice@x.com").await;
    assert_eq!(session.user_id(), Some(&alice.user_id));

    service
        .adjust_balance(&session, Decimal::from(10))
        .await
        .unwrap();

    let err = service
        .purchase_course(&session, &course.course_id)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientFunds);

    let current = service.current_user(&session).await.unwrap();
    assert_eq!(current.user.balance.to_string(), "10.00");
    assert!(!current.owns(&course.course_id));

    let topped_up = service
        .adjust_balance(&session, Decimal::from(50))
        .await
        .unwrap();
    assert_eq!(topped_up.balance.to_string(), "60.00");

    let enrolled = service
        .purchase_course(&session, &course.course_id)
        .await
        .unwrap();
    assert_eq!(enrolled.user.balance.to_string(), "40.00");
    assert!(enrolled.owns(&course.course_id));

    let reloaded = service.current_user(&session).await.unwrap();
    assert_eq!(reloaded.user.balance.to_string(), "40.00");
    assert!(reloaded.owns(&course.course_id));
}

#[tokio::test]
async fn test_register_checks_run_in_order() {
    let service = service().await;
    register(&service, "alice", "alice@x.com").await;

    let mut input = registration("bob", "");
    let err = service.register(input).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.message(), "All fields must be filled in");

    // Taken name is reported before the malformed email
    input = registration("alice", "not-an-email");
    let err = service.register(input).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(err.message(), "User name is already taken");

    input = registration("bob", "not-an-email");
    let err = service.register(input).await.unwrap_err();
    assert_eq!(err.message(), "Email address is invalid");

    input = registration("bob", "ALICE@x.com");
    let err = service.register(input).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(err.message(), "Email address is already in use");

    input = registration("bob", "bob@x.com");
    input.password = "abcd".to_string();
    input.repeat_password = "abcd".to_string();
    let err = service.register(input).await.unwrap_err();
    assert_eq!(err.message(), "Password must be at least 5 characters");

    input = registration("bob", "bob@x.com");
    input.repeat_password = "secret2".to_string();
    let err = service.register(input).await.unwrap_err();
    assert_eq!(err.message(), "Passwords do not match");

    input = registration("bob", "bob@x.com");
    input.accepted_terms = false;
    let err = service.register(input).await.unwrap_err();
    assert_eq!(err.message(), "You must accept the terms of service");

    assert!(stored_user(&service, "bob@x.com").await.is_none());
}

#[tokio::test]
async fn test_register_stores_salted_hash() {
    let service = service().await;
    let alice = register(&service, "alice", "alice@x.com").await;
    let bob = register(&service, "bob", "bob@x.com").await;

    assert_eq!(alice.balance.to_string(), "0.00");
    assert_eq!(alice.user_role, UserRole::User);

    let alice = stored_user(&service, "alice@x.com").await.unwrap();
    let bob = stored_user(&service, "bob@x.com").await.unwrap();
    assert_ne!(alice.password_hash.as_str(), PASSWORD);
    assert_ne!(alice.password_hash.as_str(), bob.password_hash.as_str());
}

#[tokio::test]
async fn test_authenticate_failures_are_distinct() {
    let service = service().await;
    register(&service, "alice", "alice@x.com").await;

    let err = service
        .authenticate("nobody@x.com", PASSWORD.to_string())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.message(), "No user with this email address exists");

    let err = service
        .authenticate("alice@x.com", "wrong-password".to_string())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert_eq!(err.message(), "Incorrect password");

    let err = service
        .authenticate("alice@x.com", "abc".to_string())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_logout_returns_anonymous() {
    let service = service().await;
    register(&service, "alice", "alice@x.com").await;
    let session = sign_in(&service, "alice@x.com").await;
    assert!(session.is_authenticated());

    let session = service.logout(session);
    assert_eq!(session, Session::Anonymous);

    let err = service.current_user(&session).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
}

#[tokio::test]
async fn test_sign_in_upgrades_hash_cost() {
    let service = service().await;
    register(&service, "alice", "alice@x.com").await;

    let config = MarketplaceConfig {
        password_cost: MarketplaceConfig::for_tests().password_cost + 1,
        ..MarketplaceConfig::for_tests()
    };
    let target_cost = config.password_cost;
    let upgraded = MarketplaceService::new(service.store().clone(), config);

    let before = stored_user(&service, "alice@x.com").await.unwrap();
    assert!(before.password_hash.needs_rehash(target_cost));

    sign_in(&upgraded, "alice@x.com").await;

    let after = stored_user(&service, "alice@x.com").await.unwrap();
    assert!(!after.password_hash.needs_rehash(target_cost));
    sign_in(&upgraded, "alice@x.com").await;
}

#[tokio::test]
async fn test_change_password() {
    let service = service().await;
    register(&service, "alice", "alice@x.com").await;
    let original = stored_user(&service, "alice@x.com").await.unwrap();

    let err = service
        .change_password(ChangePasswordInput {
            email: "alice@x.com".to_string(),
            old_password: "not-it".to_string(),
            new_password: "fresh-pass".to_string(),
            repeat_password: "fresh-pass".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    let unchanged = stored_user(&service, "alice@x.com").await.unwrap();
    assert_eq!(
        unchanged.password_hash.as_str(),
        original.password_hash.as_str()
    );

    service
        .change_password(ChangePasswordInput {
            email: "alice@x.com".to_string(),
            old_password: PASSWORD.to_string(),
            new_password: "fresh-pass".to_string(),
            repeat_password: "fresh-pass".to_string(),
        })
        .await
        .unwrap();

    let changed = stored_user(&service, "alice@x.com").await.unwrap();
    assert_ne!(changed.password_hash.as_str(), original.password_hash.as_str());

    assert!(
        service
            .authenticate("alice@x.com", "fresh-pass".to_string())
            .await
            .is_ok()
    );
    assert!(
        service
            .authenticate("alice@x.com", PASSWORD.to_string())
            .await
            .is_err()
    );
}

#[tokio::test]
async fn test_admin_password_reset() {
    let service = service().await;
    let admin = admin(&service).await;
    register(&service, "alice", "alice@x.com").await;
    let alice = sign_in(&service, "alice@x.com").await;

    let err = service
        .reset_password(&alice, "alice@x.com", "other-pass".to_string())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    service
        .reset_password(&admin, "alice@x.com", "other-pass".to_string())
        .await
        .unwrap();
    assert!(
        service
            .authenticate("alice@x.com", "other-pass".to_string())
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_seed_admin_runs_once() {
    let service = service().await;

    let first = service
        .seed_admin(
            "admin".to_string(),
            "admin@x.com".to_string(),
            PASSWORD.to_string(),
        )
        .await
        .unwrap();
    assert_eq!(first.map(|u| u.user_role), Some(UserRole::Admin));

    let second = service
        .seed_admin(
            "admin".to_string(),
            "admin@x.com".to_string(),
            PASSWORD.to_string(),
        )
        .await
        .unwrap();
    assert!(second.is_none());
}

#[tokio::test]
async fn test_long_legacy_password_still_signs_in() {
    let service = service().await;
    let long_password = "p".repeat(80);

    // Older stores hashed only the first 72 bytes of longer input
    let truncated = RawPassword::new("p".repeat(72), 5).unwrap();
    let hasher = service.config().hasher().unwrap();
    let legacy = User::new(
        UserName::new("legacy").unwrap(),
        Email::new("legacy@x.com").unwrap(),
        UserPassword::from_raw(&truncated, &hasher).unwrap(),
    );
    UserRepository::create(service.store(), &legacy)
        .await
        .unwrap();

    let session = service
        .authenticate("legacy@x.com", long_password.clone())
        .await
        .unwrap();
    assert_eq!(session.user_id(), Some(&legacy.user_id));

    // New long passwords are still refused
    let mut input = registration("fresh", "fresh@x.com");
    input.password = long_password.clone();
    input.repeat_password = long_password;
    let err = service.register(input).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_find_by_user_name() {
    let service = service().await;
    let alice = register(&service, "alice", "alice@x.com").await;

    let name = UserName::new("alice").unwrap();
    let found = UserRepository::find_by_user_name(service.store(), &name)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.user_id, alice.user_id);
    assert_eq!(found.email.as_str(), "alice@x.com");

    let name = UserName::new("bob").unwrap();
    let missing = UserRepository::find_by_user_name(service.store(), &name)
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_exists_checks_do_not_write() {
    let service = service().await;
    register(&service, "alice", "alice@x.com").await;
    let (users, courses) = service.store().counts().await.unwrap();

    for _ in 0..2 {
        assert!(service.email_exists("alice@x.com").await.unwrap());
        assert!(!service.email_exists("bob@x.com").await.unwrap());
        assert!(service.user_exists("alice").await.unwrap());
        assert!(!service.user_exists("bob").await.unwrap());
    }

    assert_eq!(service.store().counts().await.unwrap(), (users, courses));
}

// ============================================================================
// Administration
// ============================================================================

#[tokio::test]
async fn test_admin_operations_require_admin() {
    let service = service().await;
    register(&service, "alice", "alice@x.com").await;
    let alice = sign_in(&service, "alice@x.com").await;

    let err = service.list_users(&alice).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    let err = service
        .delete_user(&alice, "alice@x.com")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    let err = service
        .adjust_balance(&Session::Anonymous, Decimal::from(5))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert!(err.action().is_some());
}

#[tokio::test]
async fn test_delete_user() {
    let service = service().await;
    let admin = admin(&service).await;
    let course = add_course(&service, &admin, "Rust Basics", "0").await;
    register(&service, "alice", "alice@x.com").await;

    assert!(
        service
            .assign_course(&admin, "alice@x.com", "Rust Basics")
            .await
            .unwrap()
    );
    assert_eq!(enrollment_rows(&service).await, 1);

    let err = service
        .delete_user(&admin, "admin@x.com")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
    assert!(stored_user(&service, "admin@x.com").await.is_some());

    service.delete_user(&admin, "alice@x.com").await.unwrap();
    assert!(stored_user(&service, "alice@x.com").await.is_none());
    assert_eq!(enrollment_rows(&service).await, 0);

    // Course itself survives
    let found = CourseRepository::find_by_id(service.store(), &course.course_id)
        .await
        .unwrap();
    assert!(found.is_some());

    let err = service
        .delete_user(&admin, "alice@x.com")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_assign_and_remove_are_idempotent() {
    let service = service().await;
    let admin = admin(&service).await;
    let course = add_course(&service, &admin, "Rust Basics", "15").await;
    register(&service, "alice", "alice@x.com").await;

    assert!(
        service
            .assign_course(&admin, "alice@x.com", "Rust Basics")
            .await
            .unwrap()
    );
    assert!(
        !service
            .assign_course(&admin, "alice@x.com", "Rust Basics")
            .await
            .unwrap()
    );
    assert_eq!(enrollment_rows(&service).await, 1);

    let courses = service.courses_of(&admin, "alice@x.com").await.unwrap();
    assert_eq!(courses, vec![course.clone()]);

    // Assignment is free
    let balance = service.balance_of(&admin, "alice@x.com").await.unwrap();
    assert!(balance.is_zero());

    assert!(
        service
            .remove_course(&admin, "alice@x.com", "Rust Basics")
            .await
            .unwrap()
    );
    assert!(
        !service
            .remove_course(&admin, "alice@x.com", "Rust Basics")
            .await
            .unwrap()
    );
    assert_eq!(enrollment_rows(&service).await, 0);

    let err = service
        .assign_course(&admin, "alice@x.com", "Missing Course")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_set_balance() {
    let service = service().await;
    let admin = admin(&service).await;
    register(&service, "alice", "alice@x.com").await;

    let alice = service
        .set_balance(&admin, "alice@x.com", Decimal::new(12_550, 2))
        .await
        .unwrap();
    assert_eq!(alice.balance.to_string(), "125.50");

    let err = service
        .set_balance(&admin, "alice@x.com", Decimal::from(-1))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.message(), "Balance cannot be negative");

    let balance = service.balance_of(&admin, "alice@x.com").await.unwrap();
    assert_eq!(balance.to_string(), "125.50");

    let session = sign_in(&service, "alice@x.com").await;
    let err = service
        .adjust_balance(&session, Decimal::ZERO)
        .await
        .unwrap_err();
    assert_eq!(err.message(), "Amount must be greater than zero");
}

#[tokio::test]
async fn test_purchase_of_owned_course_is_rejected() {
    let service = service().await;
    let admin = admin(&service).await;
    let course = add_course(&service, &admin, "Rust Basics", "20").await;
    register(&service, "alice", "alice@x.com").await;
    service
        .set_balance(&admin, "alice@x.com", Decimal::from(100))
        .await
        .unwrap();

    let session = sign_in(&service, "alice@x.com").await;
    service
        .purchase_course(&session, &course.course_id)
        .await
        .unwrap();

    let err = service
        .purchase_course(&session, &course.course_id)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let current = service.current_user(&session).await.unwrap();
    assert_eq!(current.user.balance.to_string(), "80.00");
    assert_eq!(current.courses.len(), 1);
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn test_add_and_delete_course() {
    let service = service().await;
    let admin = admin(&service).await;
    add_course(&service, &admin, "Rust Basics", "19.99").await;

    let input = |name: &str, price: &str, link: &str| NewCourseInput {
        name: name.to_string(),
        description: "Hands-on lessons".to_string(),
        price: price.to_string(),
        link: link.to_string(),
    };

    let err = service
        .add_course(&admin, input("Rust Basics", "5", "https://x.com"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let err = service
        .add_course(&admin, input("Go", "5", "https://x.com"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = service
        .add_course(&admin, input("Go Basics", "five", "https://x.com"))
        .await
        .unwrap_err();
    assert_eq!(err.message(), "Amount must be a number");

    let err = service
        .add_course(&admin, input("Go Basics", "-5", "https://x.com"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = service
        .add_course(&admin, input("Go Basics", "5", "ab"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    register(&service, "alice", "alice@x.com").await;
    service
        .assign_course(&admin, "alice@x.com", "Rust Basics")
        .await
        .unwrap();
    assert_eq!(enrollment_rows(&service).await, 1);

    service.delete_course(&admin, "Rust Basics").await.unwrap();
    assert_eq!(enrollment_rows(&service).await, 0);

    let alice = sign_in(&service, "alice@x.com").await;
    let current = service.current_user(&alice).await.unwrap();
    assert!(current.courses.is_empty());
    assert!(service.list_courses().await.unwrap().is_empty());

    let err = service
        .delete_course(&admin, "Rust Basics")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_search_courses() {
    let service = service().await;
    let admin = admin(&service).await;
    for (name, price) in [
        ("Rust Basics", "10"),
        ("Rust Async", "40"),
        ("Rust Macros", "25"),
        ("Java Streams", "15"),
        ("Python Data", "30"),
        ("Advanced Rust", "50"),
        ("Go Basics", "5"),
    ] {
        add_course(&service, &admin, name, price).await;
    }

    let first = service
        .search_courses(&CatalogQuery::default())
        .await
        .unwrap();
    assert_eq!(first.total_items, 7);
    assert_eq!(first.total_pages, 2);
    assert_eq!(first.items.len(), 5);
    assert_eq!(first.items[0].name.as_str(), "Advanced Rust");
    assert!(first.has_next());

    let second = service
        .search_courses(&CatalogQuery {
            page: 1,
            ..CatalogQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(second.items.len(), 2);
    assert!(!second.has_next());

    let rust = service
        .search_courses(&CatalogQuery {
            text: "rust".to_string(),
            sort: CatalogSort::PriceHighest,
            page: 0,
        })
        .await
        .unwrap();
    let prices: Vec<String> = rust.items.iter().map(|c| c.price.to_string()).collect();
    assert_eq!(prices, vec!["50.00", "40.00", "25.00", "10.00"]);
    assert_eq!(rust.total_pages, 1);

    let none = service
        .search_courses(&CatalogQuery {
            text: "haskell".to_string(),
            ..CatalogQuery::default()
        })
        .await
        .unwrap();
    assert!(none.items.is_empty());
    assert_eq!(none.total_pages, 1);
}

#[tokio::test]
async fn test_featured_courses() {
    let service = service().await;
    assert!(service.featured_courses(3).await.unwrap().is_empty());

    let admin = admin(&service).await;
    for name in ["Rust Basics", "Java Streams", "Go Basics", "Python Data"] {
        add_course(&service, &admin, name, "10").await;
    }

    let featured = service.featured_courses(3).await.unwrap();
    assert_eq!(featured.len(), 3);

    let mut names: Vec<&str> = featured.iter().map(|c| c.name.as_str()).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), 3);

    assert_eq!(service.featured_courses(10).await.unwrap().len(), 4);
}

// ============================================================================
// Storage failures
// ============================================================================

#[tokio::test]
async fn test_failed_save_rolls_back_every_statement() {
    let service = service().await;
    let admin = admin(&service).await;
    let course = add_course(&service, &admin, "Rust Basics", "20").await;
    register(&service, "alice", "alice@x.com").await;
    service
        .assign_course(&admin, "alice@x.com", "Rust Basics")
        .await
        .unwrap();

    let email = Email::new("alice@x.com").unwrap();
    let mut enrolled = UserRepository::find_with_courses_by_email(service.store(), &email)
        .await
        .unwrap()
        .unwrap();

    // Balance update and the join-table delete run before the failing insert
    enrolled.user.set_balance(Money::parse("99").unwrap());
    let unsaved = Course::new(
        CourseName::new("Never Stored").unwrap(),
        "Hands-on lessons".to_string(),
        Money::parse("5").unwrap(),
        "https://courses.example.com".to_string(),
    );
    assert!(enrolled.enroll(unsaved));

    let err = UserRepository::save_enrollments(service.store(), &enrolled)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Storage);

    let reloaded = UserRepository::find_with_courses_by_email(service.store(), &email)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.user.balance.to_string(), "0.00");
    assert_eq!(reloaded.courses.len(), 1);
    assert!(reloaded.owns(&course.course_id));
    assert_eq!(enrollment_rows(&service).await, 1);
}

#[tokio::test]
async fn test_storage_failure_is_generic() {
    let service = service().await;
    service.store().pool().close().await;

    let err = service.list_courses().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Storage);
    assert_eq!(err.message(), "Operation failed, please try again");
}

#[tokio::test]
async fn test_duplicate_insert_reported_as_conflict() {
    let service = service().await;
    let alice = register(&service, "alice", "alice@x.com").await;

    // Same name written directly, bypassing the pre-check
    let twin = User::new(
        UserName::new("alice").unwrap(),
        Email::new("twin@x.com").unwrap(),
        UserPassword::from_db(alice.password_hash.as_str()).unwrap(),
    );
    let err = UserRepository::create(service.store(), &twin)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Storage);

    let app_err = err.into_app_error();
    assert_eq!(app_err.kind(), ErrorKind::Conflict);
    assert!(stored_user(&service, "twin@x.com").await.is_none());
}
