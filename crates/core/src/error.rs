use std::fmt;

use crate::types::DbId;

/// Why a customer may not open or complete a subsection.
///
/// Each variant maps to a stable wire code (see [`AccessDenial::code`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDenial {
    /// No active entitlement for the course.
    NotSubscribed,
    /// A chapter before the target's chapter is not fully complete.
    PreviousChaptersIncomplete,
    /// A section before the target's section (same chapter) is not complete.
    PreviousSectionsIncomplete,
    /// A sibling subsection before the target is not completed or its quiz
    /// is not passed.
    PreviousLessonsIncomplete,
    /// The target's own mandatory quiz has not been passed.
    QuizRequiredNotPassed,
}

impl AccessDenial {
    /// Wire code reported in the `code` / `decision` fields.
    pub fn code(self) -> &'static str {
        match self {
            Self::NotSubscribed => "NOT_SUBSCRIBED",
            Self::PreviousChaptersIncomplete
            | Self::PreviousSectionsIncomplete
            | Self::PreviousLessonsIncomplete => "PREREQUISITE_LOCKED",
            Self::QuizRequiredNotPassed => "QUIZ_REQUIRED_NOT_PASSED",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::NotSubscribed => "An active subscription to this course is required",
            Self::PreviousChaptersIncomplete => "Complete the previous chapters first",
            Self::PreviousSectionsIncomplete => "Complete the previous sections first",
            Self::PreviousLessonsIncomplete => {
                "Complete the previous lessons and their quizzes first"
            }
            Self::QuizRequiredNotPassed => {
                "The quiz for this lesson must be passed before it can be completed"
            }
        }
    }
}

impl fmt::Display for AccessDenial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

/// Why an access code could not be redeemed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessCodeRejection {
    /// Unknown code, wrong course, or deactivated.
    Invalid,
    Expired,
    /// `used_count` has reached `max_uses`.
    Exhausted,
}

impl AccessCodeRejection {
    pub fn code(self) -> &'static str {
        match self {
            Self::Invalid | Self::Expired => "ACCESS_CODE_INVALID",
            Self::Exhausted => "ACCESS_CODE_EXHAUSTED",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Invalid => "Access code is not valid for this course",
            Self::Expired => "Access code has expired",
            Self::Exhausted => "Access code has reached its maximum number of uses",
        }
    }
}

impl fmt::Display for AccessCodeRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Course not found: {0}")]
    CourseNotFound(String),

    #[error("Access denied: {0}")]
    AccessDenied(AccessDenial),

    #[error("Access code rejected: {0}")]
    AccessCodeRejected(AccessCodeRejection),

    /// A node's parent cannot be located in the course tree.
    #[error("Course structure error: {0}")]
    CourseStructure(String),

    #[error("Quiz for subsection {subsection_id} has no authored questions")]
    QuizNotConfigured { subsection_id: DbId },

    #[error("Subsection {subsection_id} does not require a quiz")]
    QuizNotRequired { subsection_id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AccessDenial> for CoreError {
    fn from(denial: AccessDenial) -> Self {
        CoreError::AccessDenied(denial)
    }
}

impl From<AccessCodeRejection> for CoreError {
    fn from(rejection: AccessCodeRejection) -> Self {
        CoreError::AccessCodeRejected(rejection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prerequisite_denials_share_one_wire_code() {
        assert_eq!(
            AccessDenial::PreviousChaptersIncomplete.code(),
            "PREREQUISITE_LOCKED"
        );
        assert_eq!(
            AccessDenial::PreviousSectionsIncomplete.code(),
            "PREREQUISITE_LOCKED"
        );
        assert_eq!(
            AccessDenial::PreviousLessonsIncomplete.code(),
            "PREREQUISITE_LOCKED"
        );
        assert_eq!(AccessDenial::NotSubscribed.code(), "NOT_SUBSCRIBED");
        assert_eq!(
            AccessDenial::QuizRequiredNotPassed.code(),
            "QUIZ_REQUIRED_NOT_PASSED"
        );
    }

    #[test]
    fn expired_code_reports_as_invalid() {
        assert_eq!(AccessCodeRejection::Expired.code(), "ACCESS_CODE_INVALID");
        assert_eq!(
            AccessCodeRejection::Exhausted.code(),
            "ACCESS_CODE_EXHAUSTED"
        );
    }
}
