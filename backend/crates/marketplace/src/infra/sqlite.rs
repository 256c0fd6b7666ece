//! SQLite Repository Implementations
//!
//! Every repository call runs inside its own [`UnitOfWork`]. The guard wraps a
//! `sqlx::Transaction`; dropping it without `commit()` rolls the transaction
//! back, so an early `?` return never leaves a partial write behind.

use sqlx::migrate::Migrator;
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use uuid::Uuid;

use crate::domain::entity::{course::Course, enrolled_user::EnrolledUser, user::User};
use crate::domain::repository::{CourseRepository, UserRepository};
use crate::domain::value_object::{
    CourseId, UserId,
    course_name::CourseName,
    email::Email,
    money::Money,
    user_name::UserName,
    user_password::UserPassword,
    user_role::UserRole,
};
use crate::error::{MarketError, MarketResult};

/// Embedded schema migrations
pub static MIGRATOR: Migrator = sqlx::migrate!("../../database/migrations");

// ============================================================================
// Unit of Work
// ============================================================================

/// Scoped transaction for one repository operation
pub struct UnitOfWork {
    tx: Transaction<'static, Sqlite>,
    operation: &'static str,
}

impl UnitOfWork {
    /// Begin a transaction on a pooled connection
    pub async fn begin(pool: &SqlitePool, operation: &'static str) -> MarketResult<Self> {
        let tx = pool.begin().await.map_err(|source| {
            tracing::debug!(operation, error = %source, "Could not begin unit of work");
            MarketError::Storage { operation, source }
        })?;

        Ok(Self { tx, operation })
    }

    /// Connection to run statements on
    pub fn conn(&mut self) -> &mut SqliteConnection {
        &mut *self.tx
    }

    /// Wrap a statement failure; the transaction rolls back when `self` drops
    pub fn fail(&self, source: sqlx::Error) -> MarketError {
        tracing::debug!(
            operation = self.operation,
            error = %source,
            "Unit of work failed, rolling back"
        );
        MarketError::Storage {
            operation: self.operation,
            source,
        }
    }

    /// Commit and release the connection
    pub async fn commit(self) -> MarketResult<()> {
        let operation = self.operation;
        self.tx.commit().await.map_err(|source| {
            tracing::debug!(operation, error = %source, "Commit failed");
            MarketError::Storage { operation, source }
        })
    }
}

// ============================================================================
// Store
// ============================================================================

const ENROLLED_BY_ID: &str = r#"
    SELECT
        u.user_id, u.username, u.email, u.password_hash, u.balance_minor, u.user_role,
        c.course_id, c.name AS course_name, c.description, c.price_minor, c.link
    FROM users u
    LEFT JOIN user_courses uc ON uc.user_id = u.user_id
    LEFT JOIN courses c ON c.course_id = uc.course_id
    WHERE u.user_id = ?
    ORDER BY c.name
"#;

const ENROLLED_BY_EMAIL: &str = r#"
    SELECT
        u.user_id, u.username, u.email, u.password_hash, u.balance_minor, u.user_role,
        c.course_id, c.name AS course_name, c.description, c.price_minor, c.link
    FROM users u
    LEFT JOIN user_courses uc ON uc.user_id = u.user_id
    LEFT JOIN courses c ON c.course_id = uc.course_id
    WHERE u.email = ?
    ORDER BY c.name
"#;

/// SQLite-backed marketplace store
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Apply pending schema migrations
    pub async fn migrate(&self) -> MarketResult<()> {
        MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| MarketError::Internal(format!("Migration failed: {e}")))?;

        tracing::info!("Database migrations applied");

        Ok(())
    }

    /// Row counts for users and courses
    pub async fn counts(&self) -> MarketResult<(i64, i64)> {
        let mut uow = self.begin("store.counts").await?;

        let users = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(uow.conn())
            .await
            .map_err(|e| uow.fail(e))?;

        let courses = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM courses")
            .fetch_one(uow.conn())
            .await
            .map_err(|e| uow.fail(e))?;

        uow.commit().await?;

        Ok((users, courses))
    }

    async fn begin(&self, operation: &'static str) -> MarketResult<UnitOfWork> {
        UnitOfWork::begin(&self.pool, operation).await
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for SqliteStore {
    async fn create(&self, user: &User) -> MarketResult<()> {
        let mut uow = self.begin("user.create").await?;

        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                username,
                email,
                password_hash,
                balance_minor,
                user_role
            ) VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.user_id.into_uuid())
        .bind(user.user_name.as_str())
        .bind(user.email.as_str())
        .bind(user.password_hash.as_str())
        .bind(user.balance.to_minor())
        .bind(user.user_role.code())
        .execute(uow.conn())
        .await
        .map_err(|e| uow.fail(e))?;

        uow.commit().await
    }

    async fn find_by_id(&self, user_id: &UserId) -> MarketResult<Option<User>> {
        let mut uow = self.begin("user.find_by_id").await?;

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, username, email, password_hash, balance_minor, user_role
            FROM users
            WHERE user_id = ?
            "#,
        )
        .bind(user_id.into_uuid())
        .fetch_optional(uow.conn())
        .await
        .map_err(|e| uow.fail(e))?;

        uow.commit().await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_user_name(&self, user_name: &UserName) -> MarketResult<Option<User>> {
        let mut uow = self.begin("user.find_by_user_name").await?;

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, username, email, password_hash, balance_minor, user_role
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(user_name.as_str())
        .fetch_optional(uow.conn())
        .await
        .map_err(|e| uow.fail(e))?;

        uow.commit().await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> MarketResult<Option<User>> {
        let mut uow = self.begin("user.find_by_email").await?;

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, username, email, password_hash, balance_minor, user_role
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(uow.conn())
        .await
        .map_err(|e| uow.fail(e))?;

        uow.commit().await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn exists_by_user_name(&self, user_name: &UserName) -> MarketResult<bool> {
        let mut uow = self.begin("user.exists_by_user_name").await?;

        let exists = sqlx::query_scalar::<_, i64>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?)",
        )
        .bind(user_name.as_str())
        .fetch_one(uow.conn())
        .await
        .map_err(|e| uow.fail(e))?;

        uow.commit().await?;

        Ok(exists != 0)
    }

    async fn exists_by_email(&self, email: &Email) -> MarketResult<bool> {
        let mut uow = self.begin("user.exists_by_email").await?;

        let exists = sqlx::query_scalar::<_, i64>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = ?)",
        )
        .bind(email.as_str())
        .fetch_one(uow.conn())
        .await
        .map_err(|e| uow.fail(e))?;

        uow.commit().await?;

        Ok(exists != 0)
    }

    async fn find_with_courses(&self, user_id: &UserId) -> MarketResult<Option<EnrolledUser>> {
        let mut uow = self.begin("user.find_with_courses").await?;

        let rows = sqlx::query_as::<_, EnrolledRow>(ENROLLED_BY_ID)
            .bind(user_id.into_uuid())
            .fetch_all(uow.conn())
            .await
            .map_err(|e| uow.fail(e))?;

        uow.commit().await?;

        EnrolledRow::fold(rows)
    }

    async fn find_with_courses_by_email(
        &self,
        email: &Email,
    ) -> MarketResult<Option<EnrolledUser>> {
        let mut uow = self.begin("user.find_with_courses_by_email").await?;

        let rows = sqlx::query_as::<_, EnrolledRow>(ENROLLED_BY_EMAIL)
            .bind(email.as_str())
            .fetch_all(uow.conn())
            .await
            .map_err(|e| uow.fail(e))?;

        uow.commit().await?;

        EnrolledRow::fold(rows)
    }

    async fn update(&self, user: &User) -> MarketResult<()> {
        let mut uow = self.begin("user.update").await?;
        update_user_row(&mut uow, user).await?;
        uow.commit().await
    }

    async fn save_enrollments(&self, enrolled: &EnrolledUser) -> MarketResult<()> {
        let mut uow = self.begin("user.save_enrollments").await?;

        update_user_row(&mut uow, &enrolled.user).await?;

        let user_id = enrolled.user.user_id.into_uuid();

        sqlx::query("DELETE FROM user_courses WHERE user_id = ?")
            .bind(user_id)
            .execute(uow.conn())
            .await
            .map_err(|e| uow.fail(e))?;

        for course_id in enrolled.course_ids() {
            sqlx::query("INSERT INTO user_courses (user_id, course_id) VALUES (?, ?)")
                .bind(user_id)
                .bind(course_id.into_uuid())
                .execute(uow.conn())
                .await
                .map_err(|e| uow.fail(e))?;
        }

        uow.commit().await
    }

    async fn delete(&self, user_id: &UserId) -> MarketResult<bool> {
        let mut uow = self.begin("user.delete").await?;

        let deleted = sqlx::query("DELETE FROM users WHERE user_id = ?")
            .bind(user_id.into_uuid())
            .execute(uow.conn())
            .await
            .map_err(|e| uow.fail(e))?
            .rows_affected();

        uow.commit().await?;

        Ok(deleted > 0)
    }

    async fn list_all(&self) -> MarketResult<Vec<User>> {
        let mut uow = self.begin("user.list_all").await?;

        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, username, email, password_hash, balance_minor, user_role
            FROM users
            ORDER BY username
            "#,
        )
        .fetch_all(uow.conn())
        .await
        .map_err(|e| uow.fail(e))?;

        uow.commit().await?;

        rows.into_iter().map(UserRow::into_user).collect()
    }
}

async fn update_user_row(uow: &mut UnitOfWork, user: &User) -> MarketResult<()> {
    sqlx::query(
        r#"
        UPDATE users SET
            username = ?,
            email = ?,
            password_hash = ?,
            balance_minor = ?,
            user_role = ?
        WHERE user_id = ?
        "#,
    )
    .bind(user.user_name.as_str())
    .bind(user.email.as_str())
    .bind(user.password_hash.as_str())
    .bind(user.balance.to_minor())
    .bind(user.user_role.code())
    .bind(user.user_id.into_uuid())
    .execute(uow.conn())
    .await
    .map_err(|e| uow.fail(e))?;

    Ok(())
}

// ============================================================================
// Course Repository Implementation
// ============================================================================

impl CourseRepository for SqliteStore {
    async fn create(&self, course: &Course) -> MarketResult<()> {
        let mut uow = self.begin("course.create").await?;

        sqlx::query(
            r#"
            INSERT INTO courses (
                course_id,
                name,
                description,
                price_minor,
                link
            ) VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(course.course_id.into_uuid())
        .bind(course.name.as_str())
        .bind(&course.description)
        .bind(course.price.to_minor())
        .bind(&course.link)
        .execute(uow.conn())
        .await
        .map_err(|e| uow.fail(e))?;

        uow.commit().await
    }

    async fn find_by_id(&self, course_id: &CourseId) -> MarketResult<Option<Course>> {
        let mut uow = self.begin("course.find_by_id").await?;

        let row = sqlx::query_as::<_, CourseRow>(
            r#"
            SELECT course_id, name, description, price_minor, link
            FROM courses
            WHERE course_id = ?
            "#,
        )
        .bind(course_id.into_uuid())
        .fetch_optional(uow.conn())
        .await
        .map_err(|e| uow.fail(e))?;

        uow.commit().await?;

        row.map(CourseRow::into_course).transpose()
    }

    async fn find_by_name(&self, name: &CourseName) -> MarketResult<Option<Course>> {
        let mut uow = self.begin("course.find_by_name").await?;

        let row = sqlx::query_as::<_, CourseRow>(
            r#"
            SELECT course_id, name, description, price_minor, link
            FROM courses
            WHERE name = ?
            "#,
        )
        .bind(name.as_str())
        .fetch_optional(uow.conn())
        .await
        .map_err(|e| uow.fail(e))?;

        uow.commit().await?;

        row.map(CourseRow::into_course).transpose()
    }

    async fn exists_by_name(&self, name: &CourseName) -> MarketResult<bool> {
        let mut uow = self.begin("course.exists_by_name").await?;

        let exists = sqlx::query_scalar::<_, i64>(
            "SELECT EXISTS(SELECT 1 FROM courses WHERE name = ?)",
        )
        .bind(name.as_str())
        .fetch_one(uow.conn())
        .await
        .map_err(|e| uow.fail(e))?;

        uow.commit().await?;

        Ok(exists != 0)
    }

    async fn list_all(&self) -> MarketResult<Vec<Course>> {
        let mut uow = self.begin("course.list_all").await?;

        let rows = sqlx::query_as::<_, CourseRow>(
            r#"
            SELECT course_id, name, description, price_minor, link
            FROM courses
            ORDER BY name
            "#,
        )
        .fetch_all(uow.conn())
        .await
        .map_err(|e| uow.fail(e))?;

        uow.commit().await?;

        rows.into_iter().map(CourseRow::into_course).collect()
    }

    async fn delete(&self, course_id: &CourseId) -> MarketResult<bool> {
        let mut uow = self.begin("course.delete").await?;

        let deleted = sqlx::query("DELETE FROM courses WHERE course_id = ?")
            .bind(course_id.into_uuid())
            .execute(uow.conn())
            .await
            .map_err(|e| uow.fail(e))?
            .rows_affected();

        uow.commit().await?;

        Ok(deleted > 0)
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    balance_minor: i64,
    user_role: String,
}

impl UserRow {
    fn into_user(self) -> MarketResult<User> {
        let user_role = UserRole::from_code(&self.user_role)
            .map_err(|e| MarketError::Internal(format!("Invalid user_role: {e}")))?;

        let balance = Money::from_minor(self.balance_minor)
            .map_err(|e| MarketError::Internal(format!("Invalid balance_minor: {e}")))?;

        Ok(User {
            user_id: UserId::from_uuid(self.user_id),
            user_name: UserName::from_db(self.username),
            email: Email::from_db(self.email),
            password_hash: UserPassword::from_db(self.password_hash)?,
            balance,
            user_role,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CourseRow {
    course_id: Uuid,
    name: String,
    description: String,
    price_minor: i64,
    link: String,
}

impl CourseRow {
    fn into_course(self) -> MarketResult<Course> {
        let price = Money::from_minor(self.price_minor)
            .map_err(|e| MarketError::Internal(format!("Invalid price_minor: {e}")))?;

        Ok(Course {
            course_id: CourseId::from_uuid(self.course_id),
            name: CourseName::from_db(self.name),
            description: self.description,
            price,
            link: self.link,
        })
    }
}

/// One row of the user / enrollment / course join
#[derive(sqlx::FromRow)]
struct EnrolledRow {
    user_id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    balance_minor: i64,
    user_role: String,
    course_id: Option<Uuid>,
    course_name: Option<String>,
    description: Option<String>,
    price_minor: Option<i64>,
    link: Option<String>,
}

impl EnrolledRow {
    fn split(self) -> (UserRow, Option<CourseRow>) {
        let user = UserRow {
            user_id: self.user_id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            balance_minor: self.balance_minor,
            user_role: self.user_role,
        };

        let course = match (
            self.course_id,
            self.course_name,
            self.description,
            self.price_minor,
            self.link,
        ) {
            (Some(course_id), Some(name), Some(description), Some(price_minor), Some(link)) => {
                Some(CourseRow {
                    course_id,
                    name,
                    description,
                    price_minor,
                    link,
                })
            }
            _ => None,
        };

        (user, course)
    }

    /// Collapse join rows into one aggregate. A user without courses comes
    /// back as a single row with NULL course columns.
    fn fold(rows: Vec<EnrolledRow>) -> MarketResult<Option<EnrolledUser>> {
        let mut rows = rows.into_iter().map(EnrolledRow::split);
        let Some((user_row, first_course)) = rows.next() else {
            return Ok(None);
        };

        let user = user_row.into_user()?;
        let courses = first_course
            .into_iter()
            .chain(rows.filter_map(|(_, course)| course))
            .map(CourseRow::into_course)
            .collect::<MarketResult<Vec<_>>>()?;

        Ok(Some(EnrolledUser::new(user, courses)))
    }
}
