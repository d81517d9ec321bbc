//! Ordered first-match rule tables.
//!
//! # Responsibility
//! - Evaluate `(predicate, result)` rules top to bottom with a default.
//! - Provide the membership and substring predicates used by the lookup
//!   features (responder, symptom checker, meal planner).
//!
//! # Invariants
//! - Priority rules are evaluated before ordinary rules, whatever the order
//!   they were declared in.
//! - Within each tier rules run in declaration order; the first match wins
//!   and nothing else is evaluated.
//! - Tag predicates compare exactly (case-sensitive). Text predicates test
//!   substring containment on input the caller already normalized.

pub mod meal;
pub mod responder;
pub mod symptom;

/// Boxed predicate over one input.
pub type Predicate<I> = Box<dyn Fn(&I) -> bool + Send + Sync>;

/// One named table row.
pub struct Rule<I: ?Sized, R> {
    name: &'static str,
    predicate: Predicate<I>,
    result: R,
}

impl<I: ?Sized, R> Rule<I, R> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn result(&self) -> &R {
        &self.result
    }

    pub fn matches(&self, input: &I) -> bool {
        (self.predicate)(input)
    }
}

/// Outcome of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMatch<'a, R> {
    /// Name of the winning rule; `None` when the default applied.
    pub rule: Option<&'static str>,
    pub result: &'a R,
}

/// Immutable rule table with a fallback result.
pub struct RuleSet<I: ?Sized, R> {
    priority: Vec<Rule<I, R>>,
    ordered: Vec<Rule<I, R>>,
    default: R,
}

impl<I: ?Sized, R> RuleSet<I, R> {
    pub fn new(default: R) -> Self {
        Self {
            priority: Vec::new(),
            ordered: Vec::new(),
            default,
        }
    }

    /// Appends an ordinary rule after the ones already declared.
    pub fn rule(
        mut self,
        name: &'static str,
        predicate: impl Fn(&I) -> bool + Send + Sync + 'static,
        result: R,
    ) -> Self {
        self.ordered.push(Rule {
            name,
            predicate: Box::new(predicate),
            result,
        });
        self
    }

    /// Appends a rule that is checked before every ordinary rule.
    pub fn priority_rule(
        mut self,
        name: &'static str,
        predicate: impl Fn(&I) -> bool + Send + Sync + 'static,
        result: R,
    ) -> Self {
        self.priority.push(Rule {
            name,
            predicate: Box::new(predicate),
            result,
        });
        self
    }

    /// Returns the result of the first matching rule, or the default.
    pub fn evaluate(&self, input: &I) -> &R {
        self.evaluate_match(input).result
    }

    pub fn evaluate_match(&self, input: &I) -> RuleMatch<'_, R> {
        match self.rules().find(|rule| rule.matches(input)) {
            Some(rule) => RuleMatch {
                rule: Some(rule.name),
                result: &rule.result,
            },
            None => RuleMatch {
                rule: None,
                result: &self.default,
            },
        }
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> impl Iterator<Item = &Rule<I, R>> + '_ {
        self.priority.iter().chain(self.ordered.iter())
    }

    pub fn default_result(&self) -> &R {
        &self.default
    }

    pub fn len(&self) -> usize {
        self.priority.len() + self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Insertion-ordered set of selected tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSelection {
    tags: Vec<String>,
}

impl TagSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips `tag`; returns whether it is selected afterwards.
    pub fn toggle(&mut self, tag: &str) -> bool {
        if self.remove(tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    /// Returns whether `tag` was selected.
    pub fn remove(&mut self, tag: &str) -> bool {
        match self.tags.iter().position(|selected| selected == tag) {
            Some(index) => {
                self.tags.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.tags.clear();
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|selected| selected == tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.tags.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for TagSelection {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        let mut selection = Self::new();
        for tag in iter {
            if !selection.contains(tag) {
                selection.tags.push(tag.to_string());
            }
        }
        selection
    }
}

/// Matches text containing any keyword as a substring.
pub fn contains_any(keywords: &'static [&'static str]) -> impl Fn(&str) -> bool + Send + Sync {
    move |text: &str| keywords.iter().any(|keyword| text.contains(keyword))
}

/// Matches a single tag equal to `expected`.
pub fn tag_is(expected: &'static str) -> impl Fn(&str) -> bool + Send + Sync {
    move |tag: &str| tag == expected
}

/// Matches selections containing at least one of `tags`.
pub fn has_any(tags: &'static [&'static str]) -> impl Fn(&TagSelection) -> bool + Send + Sync {
    move |selection: &TagSelection| tags.iter().any(|tag| selection.contains(tag))
}

/// Matches selections containing every one of `tags`.
pub fn has_all(tags: &'static [&'static str]) -> impl Fn(&TagSelection) -> bool + Send + Sync {
    move |selection: &TagSelection| tags.iter().all(|tag| selection.contains(tag))
}
