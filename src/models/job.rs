use serde::{Deserialize, Serialize};

use super::{contains_pattern, ensure, from_row, from_rows, returned, ModelError};
use crate::database::Storage;
use crate::sql::{sql_for_partial_update, Conditions, FieldMapper, Params, Statement, UpdateRequest};

const COLUMNS: &str = r#"id, title, salary, equity, company_handle AS "companyHandle""#;

/// Job fields share their column names.
pub const JOB_FIELDS: FieldMapper = FieldMapper::EMPTY;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    /// NUMERIC rendered as text, e.g. "0.1"
    pub equity: Option<String>,
    pub company_handle: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobNew {
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<f64>,
    #[serde(alias = "company_handle")]
    pub company_handle: String,
}

impl JobNew {
    fn validate(&self) -> Result<(), ModelError> {
        ensure(!self.title.trim().is_empty(), "title must not be empty")?;
        ensure(!self.company_handle.trim().is_empty(), "companyHandle must not be empty")?;
        validate_salary(self.salary)?;
        validate_equity(self.equity)
    }
}

/// Mutable job fields. `id` and `companyHandle` cannot be changed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobUpdate {
    pub title: Option<String>,
    pub salary: Option<i32>,
    pub equity: Option<f64>,
}

impl JobUpdate {
    pub fn to_update_request(&self) -> Result<UpdateRequest, ModelError> {
        validate_salary(self.salary)?;
        validate_equity(self.equity)?;

        let mut request = UpdateRequest::new();
        if let Some(title) = &self.title {
            ensure(!title.trim().is_empty(), "title must not be empty")?;
            request.set("title", title.as_str());
        }
        if let Some(salary) = self.salary {
            request.set("salary", salary);
        }
        if let Some(equity) = self.equity {
            request.set("equity", equity);
        }
        Ok(request)
    }
}

fn validate_salary(salary: Option<i32>) -> Result<(), ModelError> {
    ensure(salary.map_or(true, |s| s >= 0), "salary must be >= 0")
}

fn validate_equity(equity: Option<f64>) -> Result<(), ModelError> {
    ensure(
        equity.map_or(true, |e| (0.0..=1.0).contains(&e)),
        "equity must be between 0 and 1",
    )
}

/// Query-string filter for listing jobs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobFilter {
    pub title: Option<String>,
    pub min_salary: Option<i32>,
    /// `true` limits to jobs with non-zero equity; `false` does not filter.
    pub has_equity: Option<bool>,
}

impl JobFilter {
    pub fn to_statement(&self) -> Statement {
        let mut params = Params::new();
        let mut conditions = Conditions::new();

        if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
            let p = params.push(contains_pattern(title));
            conditions.push(format!("title ILIKE {}", p));
        }
        if let Some(min_salary) = self.min_salary {
            let p = params.push(min_salary);
            conditions.push(format!("salary >= {}", p));
        }
        if self.has_equity == Some(true) {
            conditions.push("equity > 0");
        }

        Statement::new(
            format!("SELECT {} FROM jobs{} ORDER BY title", COLUMNS, conditions.to_where_sql()),
            params,
        )
    }
}

impl Job {
    /// Insert a job for an existing company.
    pub async fn create(db: &dyn Storage, data: JobNew) -> Result<Job, ModelError> {
        data.validate()?;

        let mut params = Params::new();
        let p = params.push(data.company_handle.as_str());
        let company = db
            .fetch_optional(&Statement::new(
                format!("SELECT handle FROM companies WHERE handle = {}", p),
                params,
            ))
            .await?;
        if company.is_none() {
            return Err(ModelError::BadRequest(format!("No company: {}", data.company_handle)));
        }

        let mut params = Params::new();
        let title = params.push(data.title);
        let salary = params.push(data.salary);
        let equity = params.push(data.equity);
        let company_handle = params.push(data.company_handle);
        let statement = Statement::new(
            format!(
                "INSERT INTO jobs (title, salary, equity, company_handle) \
                 VALUES ({}, {}::integer, {}::numeric, {}) RETURNING {}",
                title, salary, equity, company_handle, COLUMNS
            ),
            params,
        );

        let job: Job = returned(db.fetch_optional(&statement).await?)?;
        tracing::info!("Created job {} for {}", job.id, job.company_handle);
        Ok(job)
    }

    /// All jobs matching `filter`, ordered by title.
    pub async fn find_all(db: &dyn Storage, filter: &JobFilter) -> Result<Vec<Job>, ModelError> {
        from_rows(db.fetch_all(&filter.to_statement()).await?)
    }

    pub async fn get(db: &dyn Storage, id: i32) -> Result<Job, ModelError> {
        let mut params = Params::new();
        let p = params.push(id);
        let row = db
            .fetch_optional(&Statement::new(
                format!("SELECT {} FROM jobs WHERE id = {}", COLUMNS, p),
                params,
            ))
            .await?
            .ok_or_else(|| ModelError::NotFound(format!("No job: {}", id)))?;
        from_row(row)
    }

    /// Partial update; only the fields present in `data` change.
    pub async fn update(db: &dyn Storage, id: i32, data: &JobUpdate) -> Result<Job, ModelError> {
        let request = data.to_update_request()?;
        let statement = Self::update_statement(id, &request)?;

        let row = db
            .fetch_optional(&statement)
            .await?
            .ok_or_else(|| ModelError::NotFound(format!("No job: {}", id)))?;
        from_row(row)
    }

    fn update_statement(id: i32, request: &UpdateRequest) -> Result<Statement, ModelError> {
        Ok(sql_for_partial_update(request, &JOB_FIELDS)?.into_update("jobs", "id", id, COLUMNS))
    }

    pub async fn remove(db: &dyn Storage, id: i32) -> Result<(), ModelError> {
        let mut params = Params::new();
        let p = params.push(id);
        db.fetch_optional(&Statement::new(
            format!("DELETE FROM jobs WHERE id = {} RETURNING id", p),
            params,
        ))
        .await?
        .ok_or_else(|| ModelError::NotFound(format!("No job: {}", id)))?;

        tracing::info!("Removed job {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStorage;
    use serde_json::json;

    fn job_row(id: i32, title: &str) -> serde_json::Value {
        json!({
            "id": id,
            "title": title,
            "salary": 130000,
            "equity": "0.3",
            "companyHandle": "c3"
        })
    }

    #[tokio::test]
    async fn update_returns_updated_job() {
        let db = MemoryStorage::new();
        db.respond([job_row(3, "Microbiology Analyst")]);

        let data = JobUpdate {
            title: Some("Microbiology Analyst".to_string()),
            ..Default::default()
        };
        let job = Job::update(&db, 3, &data).await.unwrap();
        assert_eq!(job.title, "Microbiology Analyst");
        assert_eq!(job.equity.as_deref(), Some("0.3"));

        let statements = db.statements();
        assert_eq!(statements.len(), 1);
        assert_eq!(
            statements[0].sql(),
            format!("UPDATE jobs SET \"title\"=$1 WHERE id = $2 RETURNING {}", COLUMNS)
        );
        assert_eq!(statements[0].params(), &[json!("Microbiology Analyst"), json!(3)]);
    }

    #[tokio::test]
    async fn update_missing_job_is_not_found() {
        let db = MemoryStorage::new();
        let data = JobUpdate {
            title: Some("X".to_string()),
            ..Default::default()
        };

        let err = Job::update(&db, 7, &data).await.unwrap_err();
        assert!(matches!(err, ModelError::NotFound(_)));
        assert_eq!(err.to_string(), "No job: 7");
    }

    #[tokio::test]
    async fn empty_update_fails_before_touching_storage() {
        let db = MemoryStorage::new();

        let err = Job::update(&db, 3, &JobUpdate::default()).await.unwrap_err();
        assert!(matches!(err, ModelError::BadRequest(_)));
        assert_eq!(err.to_string(), "No data");
        assert!(db.statements().is_empty());
    }

    #[tokio::test]
    async fn create_requires_existing_company() {
        let db = MemoryStorage::new();
        let data = JobNew {
            title: "newJob".to_string(),
            salary: Some(123000),
            equity: Some(0.123),
            company_handle: "nope".to_string(),
        };

        let err = Job::create(&db, data).await.unwrap_err();
        assert_eq!(err.to_string(), "No company: nope");
        assert_eq!(db.statements().len(), 1);
    }

    #[tokio::test]
    async fn create_binds_values_in_column_order() {
        let db = MemoryStorage::new();
        db.respond([json!({ "handle": "c1" })]);
        db.respond([json!({
            "id": 4,
            "title": "newJob",
            "salary": 123000,
            "equity": "0.123",
            "companyHandle": "c1"
        })]);

        let data = JobNew {
            title: "newJob".to_string(),
            salary: Some(123000),
            equity: Some(0.123),
            company_handle: "c1".to_string(),
        };
        let job = Job::create(&db, data).await.unwrap();
        assert_eq!(job.id, 4);

        let insert = &db.statements()[1];
        assert!(insert.sql().starts_with("INSERT INTO jobs"));
        assert_eq!(
            insert.params(),
            &[json!("newJob"), json!(123000), json!(0.123), json!("c1")]
        );
    }

    #[test]
    fn update_rejects_company_handle() {
        for body in [json!({ "company_handle": "x" }), json!({ "companyHandle": "x" })] {
            assert!(serde_json::from_value::<JobUpdate>(body).is_err());
        }
    }

    #[test]
    fn update_rejects_out_of_range_equity() {
        let data = JobUpdate {
            equity: Some(1.5),
            ..Default::default()
        };
        assert!(matches!(data.to_update_request(), Err(ModelError::BadRequest(_))));
    }

    #[test]
    fn new_job_accepts_snake_case_company_handle() {
        let data: JobNew = serde_json::from_value(json!({
            "title": "job4",
            "salary": 150000,
            "equity": 0.02,
            "company_handle": "c2"
        }))
        .unwrap();
        assert_eq!(data.company_handle, "c2");
    }

    #[test]
    fn filter_with_equity_and_salary() {
        let filter = JobFilter {
            title: Some("analyst".to_string()),
            min_salary: Some(100000),
            has_equity: Some(true),
        };
        let statement = filter.to_statement();
        assert!(statement.sql().ends_with(
            "FROM jobs WHERE title ILIKE $1 AND salary >= $2 AND equity > 0 ORDER BY title"
        ));
        assert_eq!(statement.params(), &[json!("%analyst%"), json!(100000)]);
    }

    #[test]
    fn has_equity_false_does_not_filter() {
        let filter = JobFilter {
            has_equity: Some(false),
            ..Default::default()
        };
        assert_eq!(
            filter.to_statement().sql(),
            format!("SELECT {} FROM jobs ORDER BY title", COLUMNS)
        );
    }
}
