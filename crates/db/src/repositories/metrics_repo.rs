//! Read-side dashboard aggregations.
//!
//! Every metric here is recomputed on demand from current entity state;
//! nothing is persisted and no metric holds an independent invariant.
//! Ratio math lives in `pawhaven_core` so it stays unit-testable.

use sqlx::PgPool;

use pawhaven_core::animal::{OUTCOME_ADOPTION, OUTCOME_EUTHANASIA, OUTCOME_RETURN_TO_OWNER, OUTCOME_TRANSFER};
use pawhaven_core::medical::compliance_rate;
use pawhaven_core::metrics::live_release_rate;
use pawhaven_core::types::{DateOnly, DbId};

use crate::models::metrics::{
    ComplianceSummary, MonthlyIntake, OutcomeSummary, PipelineStageCounts, ShelterCounts,
    SpeciesCount,
};

/// Provides dashboard aggregation queries, always org-scoped.
pub struct MetricsRepo;

impl MetricsRepo {
    /// Headline shelter counts as of the given date.
    pub async fn shelter_counts(
        pool: &PgPool,
        organization_id: DbId,
        as_of: DateOnly,
    ) -> Result<ShelterCounts, sqlx::Error> {
        let (in_care, available, on_hold, in_foster): (i64, i64, i64, i64) = sqlx::query_as(
            "SELECT \
                COUNT(*) FILTER (WHERE status IN ('available', 'hold', 'fostered')), \
                COUNT(*) FILTER (WHERE status = 'available'), \
                COUNT(*) FILTER (WHERE status = 'hold'), \
                COUNT(*) FILTER (WHERE status = 'fostered') \
             FROM animals WHERE organization_id = $1",
        )
        .bind(organization_id)
        .fetch_one(pool)
        .await?;

        let open_applications: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM applications \
             WHERE organization_id = $1 AND status IN ('received', 'review')",
        )
        .bind(organization_id)
        .fetch_one(pool)
        .await?;

        let overdue_tasks: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM medical_tasks \
             WHERE organization_id = $1 \
               AND status NOT IN ('completed', 'cancelled') \
               AND due_date < $2",
        )
        .bind(organization_id)
        .bind(as_of)
        .fetch_one(pool)
        .await?;

        Ok(ShelterCounts {
            in_care,
            available,
            on_hold,
            in_foster,
            open_applications,
            overdue_tasks,
        })
    }

    /// Species distribution of the in-care population.
    pub async fn species_distribution(
        pool: &PgPool,
        organization_id: DbId,
    ) -> Result<Vec<SpeciesCount>, sqlx::Error> {
        sqlx::query_as::<_, SpeciesCount>(
            "SELECT species, COUNT(*) AS count FROM animals \
             WHERE organization_id = $1 AND status IN ('available', 'hold', 'fostered') \
             GROUP BY species \
             ORDER BY count DESC, species",
        )
        .bind(organization_id)
        .fetch_all(pool)
        .await
    }

    /// Monthly intake volume for the trailing `months` months.
    pub async fn intake_trend(
        pool: &PgPool,
        organization_id: DbId,
        months: i32,
    ) -> Result<Vec<MonthlyIntake>, sqlx::Error> {
        sqlx::query_as::<_, MonthlyIntake>(
            "SELECT date_trunc('month', intake_date)::DATE AS month, COUNT(*) AS count \
             FROM intakes \
             WHERE organization_id = $1 \
               AND intake_date >= date_trunc('month', CURRENT_DATE) - ($2 || ' months')::INTERVAL \
             GROUP BY month \
             ORDER BY month",
        )
        .bind(organization_id)
        .bind(months)
        .fetch_all(pool)
        .await
    }

    /// Counts for the four-column application board. An approved
    /// application counts as `completed` once a finalization references it
    /// (adoption row or foster assignment).
    pub async fn pipeline_stage_counts(
        pool: &PgPool,
        organization_id: DbId,
    ) -> Result<PipelineStageCounts, sqlx::Error> {
        let (received, review, approved, completed): (i64, i64, i64, i64) = sqlx::query_as(
            "WITH finalized AS ( \
                 SELECT application_id FROM adoptions WHERE application_id IS NOT NULL \
                 UNION \
                 SELECT application_id FROM foster_assignments WHERE application_id IS NOT NULL \
             ) \
             SELECT \
                COUNT(*) FILTER (WHERE a.status = 'received'), \
                COUNT(*) FILTER (WHERE a.status = 'review'), \
                COUNT(*) FILTER (WHERE a.status = 'approved' AND f.application_id IS NULL), \
                COUNT(*) FILTER (WHERE a.status = 'approved' AND f.application_id IS NOT NULL) \
             FROM applications a \
             LEFT JOIN finalized f ON f.application_id = a.id \
             WHERE a.organization_id = $1",
        )
        .bind(organization_id)
        .fetch_one(pool)
        .await?;

        Ok(PipelineStageCounts {
            received,
            review,
            approved,
            completed,
        })
    }

    /// Medical compliance over a due-date window ending at `as_of`.
    ///
    /// `completed` counts tasks completed with a due date in the window;
    /// `missed` counts tasks still non-terminal whose due date passed.
    /// Both are computed from (status, due_date) at query time.
    pub async fn compliance_summary(
        pool: &PgPool,
        organization_id: DbId,
        window_start: DateOnly,
        as_of: DateOnly,
    ) -> Result<ComplianceSummary, sqlx::Error> {
        let (completed, missed): (i64, i64) = sqlx::query_as(
            "SELECT \
                COUNT(*) FILTER (WHERE status = 'completed'), \
                COUNT(*) FILTER (WHERE status NOT IN ('completed', 'cancelled') \
                                   AND due_date < $3) \
             FROM medical_tasks \
             WHERE organization_id = $1 AND due_date >= $2 AND due_date <= $3",
        )
        .bind(organization_id)
        .bind(window_start)
        .bind(as_of)
        .fetch_one(pool)
        .await?;

        Ok(ComplianceSummary {
            completed,
            missed,
            rate: compliance_rate(completed, missed),
        })
    }

    /// Outcome counts and live-release rate over an outcome-date window.
    pub async fn outcome_summary(
        pool: &PgPool,
        organization_id: DbId,
        window_start: DateOnly,
        window_end: DateOnly,
    ) -> Result<OutcomeSummary, sqlx::Error> {
        let (adoptions, transfers, returns_to_owner, euthanasias): (i64, i64, i64, i64) =
            sqlx::query_as(
                "SELECT \
                    COUNT(*) FILTER (WHERE outcome_type = $3), \
                    COUNT(*) FILTER (WHERE outcome_type = $4), \
                    COUNT(*) FILTER (WHERE outcome_type = $5), \
                    COUNT(*) FILTER (WHERE outcome_type = $6) \
                 FROM outcomes \
                 WHERE organization_id = $1 AND outcome_date >= $2 AND outcome_date <= $7",
            )
            .bind(organization_id)
            .bind(window_start)
            .bind(OUTCOME_ADOPTION)
            .bind(OUTCOME_TRANSFER)
            .bind(OUTCOME_RETURN_TO_OWNER)
            .bind(OUTCOME_EUTHANASIA)
            .bind(window_end)
            .fetch_one(pool)
            .await?;

        let live = adoptions + transfers + returns_to_owner;
        let total = live + euthanasias;

        Ok(OutcomeSummary {
            adoptions,
            transfers,
            returns_to_owner,
            euthanasias,
            live_release_rate: live_release_rate(live, total),
        })
    }
}
