use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::pandals::models::{
    ApprovalOutcome, DistrictCount, DistrictFilter, Pandal, PandalFilter, PandalStatus,
    PandalUpdate, Proximity,
};
use crate::features::pandals::store::PandalStore;
use crate::shared::constants::EARTH_RADIUS_METERS;
use crate::shared::validation::escape_like;

const PANDAL_COLUMNS: &str = "id, name, description, area, theme, country, state, district, \
     lng, lat, images, tags, rating_avg, rating_count, status, approval_count, approved_by, \
     created_by, created_at, updated_at";

/// Meters per degree of latitude, for the bounding-box prefilter
const METERS_PER_DEGREE_LAT: f64 = 111_000.0;

/// SQLSTATE raised when `statement_timeout` aborts a statement
const QUERY_CANCELED: &str = "57014";

/// PostgreSQL-backed pandal store
pub struct PgPandalStore {
    pool: PgPool,
}

impl PgPandalStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Push the haversine distance (meters) from the proximity point to the row
fn push_distance(qb: &mut QueryBuilder<'static, Postgres>, p: &Proximity) {
    qb.push(format!("({} * 2 * ASIN(LEAST(1.0, SQRT(", EARTH_RADIUS_METERS))
        .push("POWER(SIN(RADIANS(lat - ")
        .push_bind(p.lat)
        .push(") / 2), 2) + COS(RADIANS(")
        .push_bind(p.lat)
        .push(")) * COS(RADIANS(lat)) * POWER(SIN(RADIANS(lng - ")
        .push_bind(p.lng)
        .push(") / 2), 2)))))");
}

/// Build the `find_all` query for a filter
fn find_all_query(filter: &PandalFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {} FROM pandals WHERE status = ", PANDAL_COLUMNS));
    qb.push_bind(filter.status);

    if let Some(p) = &filter.proximity {
        // Cheap latitude band first so the lat index can help
        let lat_delta = p.radius_meters / METERS_PER_DEGREE_LAT;
        qb.push(" AND lat BETWEEN ")
            .push_bind(p.lat - lat_delta)
            .push(" AND ")
            .push_bind(p.lat + lat_delta);
        qb.push(" AND ");
        push_distance(&mut qb, p);
        qb.push(" <= ").push_bind(p.radius_meters);
    }

    if let Some(tag) = &filter.tag {
        qb.push(" AND ").push_bind(tag.clone()).push(" = ANY(tags)");
    }

    if let Some(text) = &filter.text {
        let pattern = format!("%{}%", escape_like(text));
        qb.push(" AND (name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR area ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR district ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if let Some(user) = &filter.exclude_user {
        qb.push(" AND created_by <> ")
            .push_bind(user.clone())
            .push(" AND NOT (")
            .push_bind(user.clone())
            .push(" = ANY(approved_by))");
    }

    match &filter.proximity {
        Some(p) => {
            qb.push(" ORDER BY ");
            push_distance(&mut qb, p);
            qb.push(" ASC");
        }
        None => {
            qb.push(" ORDER BY created_at DESC");
        }
    }

    qb
}

#[allow(dead_code)]
fn update_query(id: Uuid, update: &PandalUpdate) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("UPDATE pandals SET updated_at = NOW()");

    if let Some(status) = update.status {
        qb.push(", status = ").push_bind(status);
    }
    if let Some(avg) = update.rating_avg {
        qb.push(", rating_avg = ").push_bind(avg);
    }
    if let Some(count) = update.rating_count {
        qb.push(", rating_count = ").push_bind(count);
    }

    qb.push(" WHERE id = ").push_bind(id);
    qb.push(format!(" RETURNING {}", PANDAL_COLUMNS));
    qb
}

fn district_query(filter: &DistrictFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(
        "SELECT district, COUNT(*) AS pandal_count FROM pandals WHERE district <> '' AND status = ",
    );
    qb.push_bind(filter.status);

    if let Some(country) = &filter.country {
        qb.push(" AND country = ").push_bind(country.clone());
    }
    if let Some(state) = &filter.state {
        qb.push(" AND state = ").push_bind(state.clone());
    }

    qb.push(" GROUP BY district ORDER BY pandal_count DESC");
    qb
}

/// Single-statement vote: the WHERE clause is the guard, so concurrent votes
/// serialize on the row lock and each re-checks the latest approver list.
fn record_approval_sql() -> String {
    format!(
        r#"
        UPDATE pandals
        SET approved_by = array_append(approved_by, $2),
            approval_count = approval_count + 1,
            status = CASE
                WHEN approval_count + 1 >= $3 THEN 'approved'::pandal_status
                ELSE status
            END,
            updated_at = NOW()
        WHERE id = $1
          AND status = 'pending'
          AND NOT ($2 = ANY(approved_by))
        RETURNING {}
        "#,
        PANDAL_COLUMNS
    )
}

fn is_statement_timeout(code: Option<&str>) -> bool {
    code == Some(QUERY_CANCELED)
}

/// Log a failed statement and classify it. A statement aborted by the
/// server-side timeout was rolled back, so it surfaces as a deadline expiry.
fn store_error(context: String, e: sqlx::Error) -> AppError {
    let timed_out =
        is_statement_timeout(e.as_database_error().and_then(|db| db.code()).as_deref());
    if timed_out {
        tracing::warn!("{}: statement timeout", context);
        return AppError::Timeout(format!("{} exceeded the statement timeout", context));
    }
    tracing::error!("{}: {:?}", context, e);
    AppError::Database(e)
}

impl PgPandalStore {
    async fn fetch_optional(&self, id: Uuid) -> Result<Option<Pandal>> {
        sqlx::query_as::<_, Pandal>(&format!(
            "SELECT {} FROM pandals WHERE id = $1",
            PANDAL_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_error(format!("Failed to fetch pandal {}", id), e))
    }
}

#[async_trait]
impl PandalStore for PgPandalStore {
    async fn create(&self, pandal: &Pandal) -> Result<Uuid> {
        let id = sqlx::query_scalar::<_, Uuid>(&format!(
            r#"
            INSERT INTO pandals ({})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
            RETURNING id
            "#,
            PANDAL_COLUMNS
        ))
        .bind(pandal.id)
        .bind(&pandal.name)
        .bind(&pandal.description)
        .bind(&pandal.area)
        .bind(&pandal.theme)
        .bind(&pandal.country)
        .bind(&pandal.state)
        .bind(&pandal.district)
        .bind(pandal.lng)
        .bind(pandal.lat)
        .bind(&pandal.images)
        .bind(&pandal.tags)
        .bind(pandal.rating_avg)
        .bind(pandal.rating_count)
        .bind(pandal.status)
        .bind(pandal.approval_count)
        .bind(&pandal.approved_by)
        .bind(&pandal.created_by)
        .bind(pandal.created_at)
        .bind(pandal.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| store_error("Failed to insert pandal".to_string(), e))?;

        Ok(id)
    }

    async fn find_all(&self, filter: &PandalFilter) -> Result<Vec<Pandal>> {
        let mut qb = find_all_query(filter);
        qb.build_query_as::<Pandal>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| store_error("Failed to search pandals".to_string(), e))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Pandal> {
        self.fetch_optional(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Pandal {} not found", id)))
    }

    async fn update_by_id(&self, id: Uuid, update: &PandalUpdate) -> Result<Pandal> {
        if update.is_empty() {
            return self.find_by_id(id).await;
        }

        let mut qb = update_query(id, update);
        qb.build_query_as::<Pandal>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_error(format!("Failed to update pandal {}", id), e))?
            .ok_or_else(|| AppError::NotFound(format!("Pandal {} not found", id)))
    }

    async fn aggregate_by_district(&self, filter: &DistrictFilter) -> Result<Vec<DistrictCount>> {
        let mut qb = district_query(filter);
        qb.build_query_as::<DistrictCount>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| store_error("Failed to aggregate districts".to_string(), e))
    }

    async fn record_approval(
        &self,
        id: Uuid,
        approver: &str,
        required_approvals: i32,
    ) -> Result<ApprovalOutcome> {
        let updated = sqlx::query_as::<_, Pandal>(&record_approval_sql())
            .bind(id)
            .bind(approver)
            .bind(required_approvals)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_error(format!("Failed to record approval for pandal {}", id), e))?;

        if let Some(pandal) = updated {
            return Ok(ApprovalOutcome::Recorded(pandal));
        }

        // The guard rejected the vote; read once to say why.
        let outcome = match self.fetch_optional(id).await? {
            None => ApprovalOutcome::NotFound,
            Some(p) if p.status == PandalStatus::Approved => ApprovalOutcome::AlreadyApproved(p),
            Some(p) if p.has_vote_from(approver) => ApprovalOutcome::DuplicateVote,
            Some(p) => ApprovalOutcome::NotOpen(p.status),
        };
        Ok(outcome)
    }
}
