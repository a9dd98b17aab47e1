//! The stage machine sequencing a run
//!
//! The transition function is pure: it looks only at the stage that just ran
//! and the context it left behind. The driver in [`crate::pipeline`] owns the
//! side effects; this module owns the order they happen in, which keeps the
//! sequencing contract testable without any I/O.

use crate::context::RunContext;

/// Stages a run moves through
///
/// A set context error sends any stage straight to [`End`](Stage::End); the
/// other edges are:
///
/// ```text
/// Start → InferSchema | GenerateSchema → InferPattern
///       → FeedWindow → ExtractRecords → Stream → FeedWindow | End
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Entry marker; never executed
    Start,

    /// Discover the schema from sampled pages
    InferSchema,

    /// Build the schema from caller-supplied fields
    GenerateSchema,

    /// Discover the record-boundary pattern
    InferPattern,

    /// Advance the cursor and fetch the next window
    FeedWindow,

    /// Extract records from the current window
    ExtractRecords,

    /// Publish accumulated progress
    Stream,

    /// Terminal marker; never executed
    End,
}

/// The stage to run after `stage` finished, given the context it left
pub fn next_stage(stage: Stage, ctx: &RunContext) -> Stage {
    if ctx.has_error() {
        return Stage::End;
    }

    match stage {
        Stage::Start => {
            if ctx.fields.is_empty() {
                Stage::InferSchema
            } else {
                Stage::GenerateSchema
            }
        }
        Stage::InferSchema | Stage::GenerateSchema => Stage::InferPattern,
        Stage::InferPattern => Stage::FeedWindow,
        Stage::FeedWindow => {
            // An empty window means pagination is exhausted; that is the
            // clean way out of the loop, not an error
            if ctx.window.is_empty() {
                Stage::End
            } else {
                Stage::ExtractRecords
            }
        }
        Stage::ExtractRecords => Stage::Stream,
        Stage::Stream => {
            if ctx.cursor.is_exhausted() {
                Stage::End
            } else {
                Stage::FeedWindow
            }
        }
        Stage::End => Stage::End,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RunRequest;
    use scrivener_domain::{FieldSpec, RunId};

    fn ctx() -> RunContext {
        RunContext::new(RunId::new(), RunRequest::new("docket"), 10)
    }

    #[test]
    fn test_entry_branches_on_fields() {
        assert_eq!(next_stage(Stage::Start, &ctx()), Stage::InferSchema);

        let mut with_fields = ctx();
        with_fields.fields.push(FieldSpec::named("title"));
        assert_eq!(next_stage(Stage::Start, &with_fields), Stage::GenerateSchema);
    }

    #[test]
    fn test_both_schema_paths_lead_to_pattern() {
        assert_eq!(next_stage(Stage::InferSchema, &ctx()), Stage::InferPattern);
        assert_eq!(next_stage(Stage::GenerateSchema, &ctx()), Stage::InferPattern);
        assert_eq!(next_stage(Stage::InferPattern, &ctx()), Stage::FeedWindow);
    }

    #[test]
    fn test_empty_window_ends_the_run() {
        let ctx = ctx();
        assert!(ctx.window.is_empty());
        assert_eq!(next_stage(Stage::FeedWindow, &ctx), Stage::End);
    }

    #[test]
    fn test_filled_window_goes_to_extraction() {
        let mut ctx = ctx();
        ctx.window.push("chunk".to_string());

        assert_eq!(next_stage(Stage::FeedWindow, &ctx), Stage::ExtractRecords);
        assert_eq!(next_stage(Stage::ExtractRecords, &ctx), Stage::Stream);
    }

    #[test]
    fn test_stream_loops_until_cursor_exhausted() {
        let mut ctx = ctx();
        ctx.cursor.resolve(25);
        ctx.cursor.advance();
        assert_eq!(next_stage(Stage::Stream, &ctx), Stage::FeedWindow);

        // Drain the cursor; the failed advance marks exhaustion
        while ctx.cursor.advance().is_some() {}
        assert_eq!(next_stage(Stage::Stream, &ctx), Stage::End);
    }

    #[test]
    fn test_any_stage_with_error_ends() {
        let mut ctx = ctx();
        ctx.window.push("chunk".to_string());
        ctx.fail("No Data Found.");

        for stage in [
            Stage::Start,
            Stage::InferSchema,
            Stage::GenerateSchema,
            Stage::InferPattern,
            Stage::FeedWindow,
            Stage::ExtractRecords,
            Stage::Stream,
        ] {
            assert_eq!(next_stage(stage, &ctx), Stage::End);
        }
    }

    #[test]
    fn test_end_is_absorbing() {
        assert_eq!(next_stage(Stage::End, &ctx()), Stage::End);
    }
}
