//! Landmark header: the first three statements of every program.
//!
//! ```text
//! the bucket depot is <facing>
//! the tap is <facing>
//! the pond is <facing>
//! ```

use crate::parser::Parser;
use leaky_types::ast::Landmarks;
use leaky_types::{ErrorCode, RelativeFacing};

const LANDMARKS: [(&str, &[&str]); 3] = [
    ("bucket depot", &["the", "bucket", "depot", "is"]),
    ("tap", &["the", "tap", "is"]),
    ("pond", &["the", "pond", "is"]),
];

impl<'src> Parser<'src> {
    /// Parse the three landmark lines, in order. Returns `None` if any of
    /// them is missing or two landmarks share a square.
    pub(crate) fn parse_header(&mut self) -> Option<Landmarks> {
        let mut facings: Vec<Option<RelativeFacing>> = Vec::with_capacity(3);

        for (name, prefix) in LANDMARKS {
            if self.at_end() {
                let span = self.current_span();
                self.error_with_suggestion(
                    ErrorCode::MISSING_LANDMARK,
                    format!("program ended before the {name} position was given"),
                    span,
                    format!("add 'the {name} is in front of me' (or to my left/right, behind me)"),
                );
                facings.push(None);
                continue;
            }

            let span = self.statement_span();
            let facing = self.attempt(|p| {
                if p.eat_words(prefix) {
                    p.eat_facing()
                } else {
                    None
                }
            });
            if facing.is_none() {
                self.error_with_suggestion(
                    ErrorCode::MISSING_LANDMARK,
                    format!("expected the {name} position"),
                    span,
                    format!("the header must read: bucket depot, tap, pond; e.g. 'the {name} is to my left'"),
                );
            }
            facings.push(facing);
            self.synchronize();
        }

        let [Some(depot), Some(tap), Some(pond)] = facings[..] else {
            return None;
        };

        if depot == tap || depot == pond || tap == pond {
            let span = self.previous_span();
            self.error_at(
                ErrorCode::LANDMARKS_OVERLAP,
                "two landmarks cannot occupy the same square",
                span,
            );
            return None;
        }

        Some(Landmarks::from_facings(depot, tap, pond))
    }
}
