//! Access controller façade.
//!
//! Customer-facing handlers go through [`CourseContext`]: it loads the
//! course, its outline, the customer's entitlement and progress once per
//! request, and answers every gating question against that snapshot using
//! the resolver and the enforcer from `academy_core`.

use academy_core::entitlement::Entitlement;
use academy_core::error::{AccessDenial, CoreError};
use academy_core::lock_state::{resolve, ResolvedCourse};
use academy_core::outline::{CourseOutline, OutlineSubsection};
use academy_core::prerequisite::{check_subsection_access, AccessIntent};
use academy_core::progress::ProgressSnapshot;
use academy_core::types::DbId;
use academy_db::models::course::Course;
use academy_db::models::progress::build_snapshot;
use academy_db::repositories::{
    CertificateRepo, CompletionRepo, CourseRepo, EntitlementRepo, QuizStatusRepo,
};
use academy_db::DbPool;
use chrono::Utc;

use crate::error::{AppError, AppResult};

/// Look up an active course by slug.
pub async fn find_course(pool: &DbPool, slug: &str) -> AppResult<Course> {
    CourseRepo::find_active_by_slug(pool, slug)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::CourseNotFound(slug.to_string())))
}

/// Everything needed to make gating decisions for one customer in one course.
#[derive(Debug)]
pub struct CourseContext {
    pub customer_id: DbId,
    pub course: Course,
    pub outline: CourseOutline,
    pub entitlement: Entitlement,
    /// Entitlement evaluated at load time.
    pub subscribed: bool,
    pub progress: ProgressSnapshot,
}

impl CourseContext {
    pub async fn load(pool: &DbPool, slug: &str, customer_id: DbId) -> AppResult<Self> {
        let course = find_course(pool, slug).await?;

        let entitlement = match EntitlementRepo::find(pool, customer_id, course.id).await? {
            Some(row) => row.to_domain()?,
            None => Entitlement::none(),
        };
        let subscribed = entitlement.is_active_at(Utc::now());

        let outline = CourseRepo::load_rows(pool, course.id)
            .await?
            .into_outline(course.id)?;

        let completed = CompletionRepo::list_subsection_ids(pool, customer_id, course.id).await?;
        let quiz_rows = QuizStatusRepo::list_for_course(pool, customer_id, course.id).await?;
        let progress = build_snapshot(completed, &quiz_rows)?;

        Ok(Self {
            customer_id,
            course,
            outline,
            entitlement,
            subscribed,
            progress,
        })
    }

    /// Lock state of the whole course.
    pub fn resolve(&self) -> ResolvedCourse {
        resolve(&self.outline, &self.progress, self.subscribed)
    }

    pub fn require_subscription(&self) -> AppResult<()> {
        if self.subscribed {
            Ok(())
        } else {
            Err(self.denied(None, AccessDenial::NotSubscribed))
        }
    }

    /// Run the prerequisite checks for `subsection_id` and return its
    /// outline node.
    pub fn authorize(
        &self,
        subsection_id: DbId,
        intent: AccessIntent,
    ) -> AppResult<&OutlineSubsection> {
        match check_subsection_access(
            &self.outline,
            &self.progress,
            self.subscribed,
            subsection_id,
            intent,
        ) {
            Ok(()) => {}
            Err(CoreError::AccessDenied(denial)) => {
                return Err(self.denied(Some(subsection_id), denial));
            }
            Err(other) => return Err(other.into()),
        }
        self.outline.subsection(subsection_id).ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Subsection",
                id: subsection_id,
            })
        })
    }

    /// Queue a certificate once the course is finished. Idempotent.
    pub async fn hand_off_certificate(
        &self,
        pool: &DbPool,
        resolved: &ResolvedCourse,
    ) -> AppResult<()> {
        if !resolved.is_finished() {
            return Ok(());
        }
        if CertificateRepo::request(pool, self.customer_id, self.course.id).await? {
            tracing::info!(
                customer_id = self.customer_id,
                course_id = self.course.id,
                "Course finished, certificate requested",
            );
        }
        Ok(())
    }

    fn denied(&self, subsection_id: Option<DbId>, denial: AccessDenial) -> AppError {
        tracing::warn!(
            customer_id = self.customer_id,
            course_id = self.course.id,
            subsection_id,
            decision = denial.code(),
            ?denial,
            "Access denied",
        );
        AppError::Core(CoreError::AccessDenied(denial))
    }
}
