use serde::{Deserialize, Serialize};

use super::{contains_pattern, ensure, from_row, from_rows, returned, ModelError};
use crate::database::Storage;
use crate::sql::{sql_for_partial_update, Conditions, FieldMapper, Params, Statement, UpdateRequest};

const COLUMNS: &str = r#"handle, name, description, num_employees AS "numEmployees", logo_url AS "logoUrl""#;

pub const COMPANY_FIELDS: FieldMapper =
    FieldMapper::new(&[("numEmployees", "num_employees"), ("logoUrl", "logo_url")]);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: Option<String>,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

/// A company together with its job postings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub jobs: Vec<CompanyJob>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyJob {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompanyNew {
    pub handle: String,
    pub name: String,
    pub description: Option<String>,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

impl CompanyNew {
    fn validate(&self) -> Result<(), ModelError> {
        ensure(!self.handle.trim().is_empty(), "handle must not be empty")?;
        ensure(!self.name.trim().is_empty(), "name must not be empty")?;
        ensure(self.num_employees.map_or(true, |n| n >= 0), "numEmployees must be >= 0")
    }
}

/// Mutable company fields. `handle` is the key and cannot be changed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompanyUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

impl CompanyUpdate {
    pub fn to_update_request(&self) -> Result<UpdateRequest, ModelError> {
        let mut request = UpdateRequest::new();
        if let Some(name) = &self.name {
            ensure(!name.trim().is_empty(), "name must not be empty")?;
            request.set("name", name.as_str());
        }
        if let Some(description) = &self.description {
            request.set("description", description.as_str());
        }
        if let Some(num_employees) = self.num_employees {
            ensure(num_employees >= 0, "numEmployees must be >= 0")?;
            request.set("numEmployees", num_employees);
        }
        if let Some(logo_url) = &self.logo_url {
            request.set("logoUrl", logo_url.as_str());
        }
        Ok(request)
    }
}

/// Query-string filter for listing companies. Every criterion is optional
/// and they combine with AND.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompanyFilter {
    pub name_like: Option<String>,
    pub min_employees: Option<i32>,
    pub max_employees: Option<i32>,
}

impl CompanyFilter {
    pub fn to_statement(&self) -> Result<Statement, ModelError> {
        if let (Some(min), Some(max)) = (self.min_employees, self.max_employees) {
            ensure(min <= max, "minEmployees cannot be greater than maxEmployees")?;
        }

        let mut params = Params::new();
        let mut conditions = Conditions::new();

        if let Some(name) = self.name_like.as_deref().filter(|n| !n.is_empty()) {
            let p = params.push(contains_pattern(name));
            conditions.push(format!("name ILIKE {}", p));
        }
        if let Some(min) = self.min_employees {
            let p = params.push(min);
            conditions.push(format!("num_employees >= {}", p));
        }
        if let Some(max) = self.max_employees {
            let p = params.push(max);
            conditions.push(format!("num_employees <= {}", p));
        }

        Ok(Statement::new(
            format!(
                "SELECT {} FROM companies{} ORDER BY name",
                COLUMNS,
                conditions.to_where_sql()
            ),
            params,
        ))
    }
}

impl Company {
    /// Insert a company. Fails with BadRequest if the handle is taken.
    pub async fn create(db: &dyn Storage, data: CompanyNew) -> Result<Company, ModelError> {
        data.validate()?;

        let mut params = Params::new();
        let p = params.push(data.handle.as_str());
        let duplicate = db
            .fetch_optional(&Statement::new(
                format!("SELECT handle FROM companies WHERE handle = {}", p),
                params,
            ))
            .await?;
        if duplicate.is_some() {
            return Err(ModelError::BadRequest(format!("Duplicate company: {}", data.handle)));
        }

        let mut params = Params::new();
        let handle = params.push(data.handle);
        let name = params.push(data.name);
        let description = params.push(data.description);
        let num_employees = params.push(data.num_employees);
        let logo_url = params.push(data.logo_url);
        let statement = Statement::new(
            format!(
                "INSERT INTO companies (handle, name, description, num_employees, logo_url) \
                 VALUES ({}, {}, {}, {}::integer, {}) RETURNING {}",
                handle, name, description, num_employees, logo_url, COLUMNS
            ),
            params,
        );

        let company: Company = returned(db.fetch_optional(&statement).await?)?;
        tracing::info!("Created company {}", company.handle);
        Ok(company)
    }

    /// All companies matching `filter`, ordered by name.
    pub async fn find_all(db: &dyn Storage, filter: &CompanyFilter) -> Result<Vec<Company>, ModelError> {
        let statement = filter.to_statement()?;
        from_rows(db.fetch_all(&statement).await?)
    }

    /// A company and its jobs. Fails with NotFound if there is no such handle.
    pub async fn get(db: &dyn Storage, handle: &str) -> Result<CompanyDetail, ModelError> {
        let mut params = Params::new();
        let p = params.push(handle);
        let row = db
            .fetch_optional(&Statement::new(
                format!("SELECT {} FROM companies WHERE handle = {}", COLUMNS, p),
                params,
            ))
            .await?
            .ok_or_else(|| ModelError::NotFound(format!("No company: {}", handle)))?;
        let company: Company = from_row(row)?;

        let mut params = Params::new();
        let p = params.push(handle);
        let jobs = db
            .fetch_all(&Statement::new(
                format!(
                    "SELECT id, title, salary, equity FROM jobs WHERE company_handle = {} ORDER BY id",
                    p
                ),
                params,
            ))
            .await?;

        Ok(CompanyDetail {
            company,
            jobs: from_rows(jobs)?,
        })
    }

    /// Partial update; only the fields present in `data` change.
    pub async fn update(db: &dyn Storage, handle: &str, data: &CompanyUpdate) -> Result<Company, ModelError> {
        let request = data.to_update_request()?;
        let statement = Self::update_statement(handle, &request)?;

        let row = db
            .fetch_optional(&statement)
            .await?
            .ok_or_else(|| ModelError::NotFound(format!("No company: {}", handle)))?;
        from_row(row)
    }

    fn update_statement(handle: &str, request: &UpdateRequest) -> Result<Statement, ModelError> {
        Ok(sql_for_partial_update(request, &COMPANY_FIELDS)?.into_update(
            "companies",
            "handle",
            handle,
            COLUMNS,
        ))
    }

    pub async fn remove(db: &dyn Storage, handle: &str) -> Result<(), ModelError> {
        let mut params = Params::new();
        let p = params.push(handle);
        db.fetch_optional(&Statement::new(
            format!("DELETE FROM companies WHERE handle = {} RETURNING handle", p),
            params,
        ))
        .await?
        .ok_or_else(|| ModelError::NotFound(format!("No company: {}", handle)))?;

        tracing::info!("Removed company {}", handle);
        Ok(())
    }
}
