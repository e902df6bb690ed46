//! Instruction phrases.
//!
//! Each statement is dispatched on its first word and then matched against
//! that verb's templates. Structural rules that only need the phrase itself
//! (no behind-me targets for bucket handling, no `here without overflow`,
//! no zero-capacity buckets) are checked here, before anything runs.

use crate::parser::Parser;
use leaky_lexer::TokenKind;
use leaky_types::ast::{
    EmptyTarget, FillKind, Instruction, InstructionKind, Invocation, MAX_CAPACITY_PINTS,
};
use leaky_types::{ErrorCode, RelativeFacing, Span, Turn};

/// Phrase forms per leading word, used for suggestions.
fn templates_for(verb: &str) -> Option<&'static str> {
    let forms = match verb {
        "collect" => "collect a <n|max> pint bucket [with <n> holes]",
        "turn" => "turn left | turn right | turn around | turn all the way around",
        "fill" => "fill the bucket to the top | fill the bucket with <n> pints of water",
        "let" => "let god fill the bucket as he wishes",
        "pick" => "pick up the bucket <in front of me|to my left|to my right>",
        "place" => "place the bucket down <in front of me|to my left|to my right>",
        "empty" => "empty the bucket here | empty the bucket onto the square <facing> [without overflow]",
        "move" => "move <n> steps | move until my bucket is empty",
        "shrink" => "shrink my bucket",
        "i" => "i wish to speak with god | hear from god | scream into the void | have my wellies returned",
        "put" => "put on my wellies",
        "take" => "take off my wellies",
        _ => return None,
    };
    Some(forms)
}

impl<'src> Parser<'src> {
    /// Parse every statement after the header.
    pub(crate) fn parse_instructions(&mut self) -> Vec<Instruction> {
        let mut instructions = Vec::new();
        while !self.at_end() && !self.too_many_errors() {
            let span = self.statement_span();
            if let Some(kind) = self.parse_instruction(span) {
                instructions.push(Instruction::new(instructions.len(), kind, span));
            }
            self.synchronize();
        }
        instructions
    }

    fn parse_instruction(&mut self, span: Span) -> Option<InstructionKind> {
        let verb = match &self.peek().kind {
            TokenKind::Word(w) => w.clone(),
            other => {
                let message = format!("expected an instruction, found '{other}'");
                self.error_at(ErrorCode::UNKNOWN_INSTRUCTION, message, span);
                return None;
            }
        };

        let kind = match verb.as_str() {
            "collect" => self.attempt(Self::parse_collect),
            "turn" => self.attempt(Self::parse_turn),
            "fill" => self.attempt(Self::parse_fill),
            "let" => self.attempt(|p| {
                p.eat_words(&["let", "god", "fill", "the", "bucket", "as", "he", "wishes"])
                    .then_some(InstructionKind::Fill(FillKind::LetGod))
            }),
            "pick" => self.attempt(|p| {
                p.eat_words(&["pick", "up", "the", "bucket"])
                    .then(|| p.eat_facing())
                    .flatten()
                    .map(InstructionKind::PickUp)
            }),
            "place" => self.attempt(|p| {
                p.eat_words(&["place", "the", "bucket", "down"])
                    .then(|| p.eat_facing())
                    .flatten()
                    .map(InstructionKind::PlaceDown)
            }),
            "empty" => self.attempt(Self::parse_empty),
            "move" => self.attempt(Self::parse_move),
            "shrink" => self.attempt(|p| {
                p.eat_words(&["shrink", "my", "bucket"])
                    .then_some(InstructionKind::Shrink)
            }),
            "i" => self.attempt(Self::parse_invocation),
            "put" => self.attempt(|p| {
                p.eat_words(&["put", "on", "my", "wellies"])
                    .then_some(InstructionKind::PutOnWellies)
            }),
            "take" => self.attempt(|p| {
                p.eat_words(&["take", "off", "my", "wellies"])
                    .then_some(InstructionKind::TakeOffWellies)
            }),
            _ => None,
        };

        let Some(kind) = kind else {
            let message = format!("unrecognised instruction starting with '{verb}'");
            match templates_for(&verb) {
                Some(forms) => self.error_with_suggestion(
                    ErrorCode::UNKNOWN_INSTRUCTION,
                    message,
                    span,
                    format!("expected one of: {forms}"),
                ),
                None => self.error_at(ErrorCode::UNKNOWN_INSTRUCTION, message, span),
            }
            return None;
        };

        self.check_structure(kind, span);
        Some(kind)
    }

    // ── Templates ─────────────────────────────────────────────────────────────

    /// `collect a (N|max) pint bucket [with H hole(s)]`
    fn parse_collect(&mut self) -> Option<InstructionKind> {
        if !self.eat_words(&["collect", "a"]) {
            return None;
        }
        let capacity = if self.eat_word("max") {
            MAX_CAPACITY_PINTS
        } else {
            self.eat_number()?
        };
        self.eat_any(&[&["pint"], &["pints"]])?;
        if !self.eat_word("bucket") {
            return None;
        }
        let holes = if self.eat_word("with") {
            let holes = self.eat_number()?;
            self.eat_any(&[&["holes"], &["hole"]])?;
            holes
        } else {
            0
        };
        Some(InstructionKind::CollectBucket { capacity, holes })
    }

    /// `turn (left|right|around|all the way around)`
    fn parse_turn(&mut self) -> Option<InstructionKind> {
        if !self.eat_word("turn") {
            return None;
        }
        let turn = match self.eat_any(&[
            &["left"],
            &["right"],
            &["around"],
            &["all", "the", "way", "around"],
        ])? {
            0 => Turn::Left,
            1 => Turn::Right,
            2 => Turn::Around,
            _ => Turn::AllTheWayAround,
        };
        Some(InstructionKind::Turn(turn))
    }

    /// `fill the bucket to the top` | `fill the bucket with N pint(s) of water`
    fn parse_fill(&mut self) -> Option<InstructionKind> {
        if !self.eat_words(&["fill", "the", "bucket"]) {
            return None;
        }
        if self.eat_words(&["to", "the", "top"]) {
            return Some(InstructionKind::Fill(FillKind::ToTheTop));
        }
        if !self.eat_word("with") {
            return None;
        }
        let pints = self.eat_number()?;
        self.eat_any(&[&["pints"], &["pint"]])?;
        self.eat_words(&["of", "water"])
            .then_some(InstructionKind::Fill(FillKind::Pints(pints)))
    }

    /// `empty the bucket here` | `empty the bucket (onto|on to) the square F`,
    /// either optionally followed by `without overflow`.
    fn parse_empty(&mut self) -> Option<InstructionKind> {
        if !self.eat_words(&["empty", "the", "bucket"]) {
            return None;
        }
        let target = if self.eat_word("here") {
            EmptyTarget::Here
        } else {
            self.eat_any(&[&["onto"], &["on", "to"]])?;
            if !self.eat_words(&["the", "square"]) {
                return None;
            }
            EmptyTarget::Square(self.eat_facing()?)
        };
        let without_overflow = self.eat_words(&["without", "overflow"]);
        Some(InstructionKind::Empty {
            target,
            without_overflow,
        })
    }

    /// `move N step(s)` | `move until my bucket is empty`
    fn parse_move(&mut self) -> Option<InstructionKind> {
        if !self.eat_word("move") {
            return None;
        }
        if self.eat_words(&["until", "my", "bucket", "is", "empty"]) {
            return Some(InstructionKind::MoveUntilEmpty);
        }
        let steps = self.eat_number()?;
        self.eat_any(&[&["steps"], &["step"]])?;
        Some(InstructionKind::Move { steps })
    }

    /// `i wish to ...`
    fn parse_invocation(&mut self) -> Option<InstructionKind> {
        if !self.eat_words(&["i", "wish", "to"]) {
            return None;
        }
        let invocation = match self.eat_any(&[
            &["speak", "with", "god"],
            &["hear", "from", "god"],
            &["scream", "into", "the", "void"],
            &["scream", "in", "to", "the", "void"],
            &["have", "my", "wellies", "returned"],
        ])? {
            0 => Invocation::SpeakWithGod,
            1 => Invocation::HearFromGod,
            2 | 3 => Invocation::ScreamIntoVoid,
            _ => Invocation::WelliesReturned,
        };
        Some(InstructionKind::Invoke(invocation))
    }

    // ── Structural Checks ─────────────────────────────────────────────────────

    fn check_structure(&mut self, kind: InstructionKind, span: Span) {
        match kind {
            InstructionKind::PickUp(RelativeFacing::Behind)
            | InstructionKind::PlaceDown(RelativeFacing::Behind)
            | InstructionKind::Empty {
                target: EmptyTarget::Square(RelativeFacing::Behind),
                ..
            } => self.error_with_suggestion(
                ErrorCode::TARGET_BEHIND,
                "cannot handle a bucket on the square behind me",
                span,
                "turn around first, then use 'in front of me'",
            ),
            InstructionKind::Empty {
                target: EmptyTarget::Here,
                without_overflow: true,
            } => self.error_at(
                ErrorCode::WITHOUT_OVERFLOW_HERE,
                "'without overflow' only applies when emptying into another bucket",
                span,
            ),
            InstructionKind::CollectBucket { capacity: 0, .. } => self.error_at(
                ErrorCode::ZERO_CAPACITY,
                "a bucket must hold at least 1 pint",
                span,
            ),
            InstructionKind::CollectBucket { capacity, .. } if capacity > MAX_CAPACITY_PINTS => {
                self.error_with_suggestion(
                    ErrorCode::NUMBER_TOO_LARGE,
                    format!("no bucket holds {capacity} pints"),
                    span,
                    format!("the largest bucket holds {MAX_CAPACITY_PINTS} pints; say 'max'"),
                )
            }
            _ => {}
        }
    }

    /// Warn about `take off my wellies` with no earlier unmatched
    /// `put on my wellies`.
    pub(crate) fn check_wellies_balance(&mut self, instructions: &[Instruction]) {
        let mut depth: usize = 0;
        for instr in instructions {
            match instr.kind {
                InstructionKind::PutOnWellies => depth += 1,
                InstructionKind::TakeOffWellies => match depth.checked_sub(1) {
                    Some(d) => depth = d,
                    None => self.warning_at(
                        ErrorCode::UNMATCHED_TAKE_OFF,
                        "taking off wellies that were never put on",
                        instr.span,
                    ),
                },
                _ => {}
            }
        }
    }
}
