use std::collections::HashSet;
use std::path::Path;
use tokio::fs;
use tracing::{error, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpellingIssue {
    pub word: String,
    pub offset: usize,
}

pub trait SpellChecker: Send + Sync {
    fn check(&self, text: &str) -> Vec<SpellingIssue>;
}

/// Accepts everything.
#[derive(Debug, Default, Clone)]
pub struct NoSpellCheck;

impl SpellChecker for NoSpellCheck {
    fn check(&self, _text: &str) -> Vec<SpellingIssue> {
        Vec::new()
    }
}

/// Flags alphabetic words missing from a known word list. Comparison is
/// case-insensitive; tokens containing digits are skipped.
#[derive(Debug, Default, Clone)]
pub struct WordListChecker {
    words: HashSet<String>,
}

impl WordListChecker {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl SpellChecker for WordListChecker {
    fn check(&self, text: &str) -> Vec<SpellingIssue> {
        let mut issues = Vec::new();
        for (offset, token) in tokens(text) {
            if token.chars().any(|c| c.is_ascii_digit()) {
                continue;
            }
            if !self.words.contains(&token.to_lowercase()) {
                issues.push(SpellingIssue {
                    word: token.to_string(),
                    offset,
                });
            }
        }
        issues
    }
}

fn tokens(text: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut start = None;
    let mut spans = Vec::new();
    for (index, ch) in text.char_indices() {
        let word_char = ch.is_alphanumeric() || ch == '\'';
        match (word_char, start) {
            (true, None) => start = Some(index),
            (false, Some(begin)) => {
                spans.push((begin, &text[begin..index]));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(begin) = start {
        spans.push((begin, &text[begin..]));
    }
    spans
        .into_iter()
        .map(|(begin, word)| {
            let trimmed = word.trim_start_matches('\'');
            (begin + word.len() - trimmed.len(), trimmed.trim_end_matches('\''))
        })
        .filter(|(_, word)| !word.is_empty())
}

pub async fn load_word_list(path: &Path) -> Option<WordListChecker> {
    match fs::read_to_string(path).await {
        Ok(contents) => {
            let checker = WordListChecker::new(contents.lines());
            info!("loaded {} words for spell checking", checker.len());
            Some(checker)
        }
        Err(err) => {
            error!("failed to read word list {}: {err}", path.display());
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    AwaitingConfirmation,
    Resolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    Continue,
    ReviewChanges,
}

/// What to do with a note submission once the gate has seen it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    Submit,
    Hold(Vec<SpellingIssue>),
    Dismissed,
}

/// Pauses a note submission while spelling issues await a decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionGate {
    state: GateState,
    issues: Vec<SpellingIssue>,
}

impl SubmissionGate {
    pub fn open(issues: Vec<SpellingIssue>) -> Self {
        let state = if issues.is_empty() {
            GateState::Resolved
        } else {
            GateState::AwaitingConfirmation
        };
        Self { state, issues }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn outcome(&self) -> GateOutcome {
        match self.state {
            GateState::Resolved => GateOutcome::Submit,
            GateState::AwaitingConfirmation => GateOutcome::Hold(self.issues.clone()),
        }
    }

    pub fn resolve(&mut self, action: ConfirmAction) -> GateOutcome {
        if self.state == GateState::Resolved {
            return GateOutcome::Dismissed;
        }
        self.state = GateState::Resolved;
        match action {
            ConfirmAction::Continue => GateOutcome::Submit,
            ConfirmAction::ReviewChanges => GateOutcome::Dismissed,
        }
    }
}

/// Runs the gate for one form post. Continue releases a held note and
/// Review Changes never submits, even if the edited text is now clean.
pub fn evaluate(checker: &dyn SpellChecker, text: &str, action: Option<ConfirmAction>) -> GateOutcome {
    let mut gate = SubmissionGate::open(checker.check(text));
    match action {
        Some(ConfirmAction::ReviewChanges) => gate.resolve(ConfirmAction::ReviewChanges),
        Some(ConfirmAction::Continue) if gate.state() == GateState::AwaitingConfirmation => {
            gate.resolve(ConfirmAction::Continue)
        }
        _ => gate.outcome(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> WordListChecker {
        WordListChecker::new(["the", "client", "ate", "well", "today", "didn't"])
    }

    #[test]
    fn word_list_flags_unknown_words_with_offsets() {
        let issues = checker().check("The clinet ate well todya.");
        assert_eq!(
            issues,
            vec![
                SpellingIssue { word: "clinet".to_string(), offset: 4 },
                SpellingIssue { word: "todya".to_string(), offset: 20 },
            ]
        );
    }

    #[test]
    fn word_list_skips_numbers_and_handles_apostrophes() {
        assert!(checker().check("Client didn't eat 3pm 'today'").iter().all(|i| i.word == "eat"));
        assert!(NoSpellCheck.check("asdf qwer").is_empty());
    }

    #[test]
    fn clean_text_resolves_immediately() {
        let gate = SubmissionGate::open(Vec::new());
        assert_eq!(gate.state(), GateState::Resolved);
        assert_eq!(gate.outcome(), GateOutcome::Submit);
    }

    #[test]
    fn issues_hold_until_continue() {
        let issues = checker().check("clinet");
        let mut gate = SubmissionGate::open(issues.clone());
        assert_eq!(gate.state(), GateState::AwaitingConfirmation);
        assert_eq!(gate.outcome(), GateOutcome::Hold(issues));

        assert_eq!(gate.resolve(ConfirmAction::Continue), GateOutcome::Submit);
        assert_eq!(gate.state(), GateState::Resolved);
        assert_eq!(gate.resolve(ConfirmAction::Continue), GateOutcome::Dismissed);
    }

    #[test]
    fn review_changes_dismisses_without_submitting() {
        let mut gate = SubmissionGate::open(checker().check("clinet"));
        assert_eq!(gate.resolve(ConfirmAction::ReviewChanges), GateOutcome::Dismissed);
        assert_eq!(gate.state(), GateState::Resolved);
    }

    #[test]
    fn evaluate_routes_prompt_buttons_through_the_gate() {
        let checker = checker();
        assert!(matches!(evaluate(&checker, "clinet", None), GateOutcome::Hold(_)));
        assert_eq!(evaluate(&checker, "clinet", Some(ConfirmAction::Continue)), GateOutcome::Submit);
        assert_eq!(
            evaluate(&checker, "clinet", Some(ConfirmAction::ReviewChanges)),
            GateOutcome::Dismissed
        );
        assert_eq!(evaluate(&checker, "the client", None), GateOutcome::Submit);
        assert_eq!(evaluate(&checker, "the client", Some(ConfirmAction::Continue)), GateOutcome::Submit);
        assert_eq!(
            evaluate(&checker, "the client", Some(ConfirmAction::ReviewChanges)),
            GateOutcome::Dismissed
        );
    }
}
