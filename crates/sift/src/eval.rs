//! Reference evaluator: applies an expression tree to a record.
//!
//! Evaluation is pure. Errors are per record: a comparison that cannot be
//! decided for this record (incomparable kinds, a modifier that does not fit
//! the field) fails instead of silently answering `false`.

use std::borrow::Cow;
use std::cmp::Ordering;

use deunicode::deunicode_char;

use crate::error::{Error, Result};
use crate::operator::{Modifier, Operator, Options};
use crate::predicate::{Comparison, Conjunction, Operand, Predicate};
use crate::value::{Literal, Value};

impl<T> Predicate<T> {
    /// Evaluates the expression against a record.
    ///
    /// AND stops at the first false child, OR at the first true child, both
    /// in child order. An empty AND is true, an empty OR is false.
    pub fn evaluate(&self, record: &T) -> Result<bool> {
        match self {
            Predicate::Comparison(comparison) => comparison.evaluate(record),
            Predicate::Compound(compound) => match compound.kind() {
                Conjunction::And => {
                    for child in compound.children() {
                        if !child.evaluate(record)? {
                            return Ok(false);
                        }
                    }
                    Ok(true)
                }
                Conjunction::Or => {
                    for child in compound.children() {
                        if child.evaluate(record)? {
                            return Ok(true);
                        }
                    }
                    Ok(false)
                }
            },
            Predicate::Not(negation) => Ok(!negation.child().evaluate(record)?),
        }
    }
}

impl<T> Comparison<T> {
    /// Evaluates this comparison against a record.
    pub fn evaluate(&self, record: &T) -> Result<bool> {
        let value = self.field().value(record);

        match self.get_modifier() {
            Modifier::Direct => {
                if value.is_list() && self.operator() != Operator::Contains {
                    return Err(self.unsupported_modifier(&value));
                }
                self.test(&value)
            }
            Modifier::Any => {
                for element in self.elements(&value)? {
                    if self.test(element)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Modifier::All => {
                for element in self.elements(&value)? {
                    if !self.test(element)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
        }
    }

    /// Elements of a collection field; a missing collection counts as empty.
    fn elements<'v, 'a>(&self, value: &'v Value<'a>) -> Result<&'v [Value<'a>]> {
        match value {
            Value::List(items) => Ok(items),
            Value::None => Ok(&[]),
            other => Err(self.unsupported_modifier(other)),
        }
    }

    /// Applies the operator to one (scalar or element) field value.
    fn test(&self, value: &Value<'_>) -> Result<bool> {
        let options = self.get_options();

        match (self.operator(), self.operand()) {
            (Operator::EqualTo, Operand::Scalar(lit)) => {
                Ok(values_equal(value, &lit.as_value(), options))
            }
            (Operator::NotEqualTo, Operand::Scalar(lit)) => {
                Ok(!values_equal(value, &lit.as_value(), options))
            }
            (op, Operand::Scalar(lit)) if op.is_ordering() => {
                let ordering = self.order(value, lit)?;
                Ok(ordering.is_some_and(|o| op.eval_ordering(o)))
            }
            (op, Operand::Scalar(Literal::String(pattern))) if op.is_string_op() => {
                let subject = match value {
                    Value::String(s) => *s,
                    Value::None => return Ok(false),
                    other => return Err(self.incomparable(other, "string")),
                };
                let subject = fold(subject, options);
                let pattern = fold(pattern, options);
                Ok(match op {
                    Operator::BeginsWith => subject.starts_with(&*pattern),
                    Operator::EndsWith => subject.ends_with(&*pattern),
                    _ => like_match(&subject, &pattern),
                })
            }
            (Operator::Contains, Operand::Scalar(lit)) => match value {
                Value::List(items) => Ok(items
                    .iter()
                    .any(|item| values_equal(item, &lit.as_value(), options))),
                Value::String(s) => match lit {
                    Literal::String(needle) => {
                        Ok(fold(s, options).contains(&*fold(needle, options)))
                    }
                    other => Err(self.incomparable(value, other.kind())),
                },
                Value::None => Ok(false),
                other => Err(self.incomparable(other, lit.kind())),
            },
            (Operator::In, Operand::List(candidates)) => Ok(candidates
                .iter()
                .any(|lit| values_equal(value, &lit.as_value(), options))),
            (Operator::Between, Operand::Range(lower, upper)) => {
                let above = self.order(value, lower)?;
                let below = self.order(value, upper)?;
                Ok(matches!(above, Some(Ordering::Greater | Ordering::Equal))
                    && matches!(below, Some(Ordering::Less | Ordering::Equal)))
            }
            // Shapes are checked when the comparison is built.
            _ => Ok(false),
        }
    }

    /// Orders a field value against an operand literal.
    ///
    /// `Ok(None)` means "not ordered" (missing value or NaN), which makes the
    /// comparison false.
    fn order(&self, value: &Value<'_>, lit: &Literal) -> Result<Option<Ordering>> {
        if value.is_none() {
            return Ok(None);
        }
        let operand = lit.as_value();
        if !same_kind(value, &operand) {
            return Err(self.incomparable(value, lit.kind()));
        }
        Ok(compare_scalars(value, &operand, self.get_options()))
    }

    fn incomparable(&self, value: &Value<'_>, right: &'static str) -> Error {
        Error::IncomparableTypes {
            field: self.field().name(),
            operator: self.operator(),
            left: value.kind(),
            right,
        }
    }

    fn unsupported_modifier(&self, value: &Value<'_>) -> Error {
        Error::UnsupportedModifier {
            field: self.field().name(),
            modifier: self.get_modifier(),
            found: value.kind(),
        }
    }
}

/// Applies string options: diacritics are stripped, then case is lowered.
///
/// Stripping never changes the number of characters apart from dropping
/// combining marks, so `?` in a LIKE pattern still matches one letter.
pub fn fold(s: &str, options: Options) -> Cow<'_, str> {
    let mut folded = Cow::Borrowed(s);
    if options.diacritic_insensitive() && !s.is_ascii() {
        folded = Cow::Owned(strip_diacritics(&folded));
    }
    if options.case_insensitive() {
        folded = Cow::Owned(folded.to_lowercase());
    }
    folded
}

fn strip_diacritics(s: &str) -> String {
    s.chars()
        .filter(|&c| !is_combining_mark(c))
        .map(base_letter)
        .collect()
}

/// Base letter of an accented Latin letter (`é` -> `e`, `Ø` -> `O`). Letters
/// that transliterate to more than one letter (`ß`, `Æ`) and every other
/// script are kept as they are.
fn base_letter(c: char) -> char {
    let latin = matches!(c, '\u{C0}'..='\u{24F}' | '\u{1E00}'..='\u{1EFF}');
    if !latin || matches!(c, '\u{D7}' | '\u{F7}') {
        return c;
    }
    let Some(ascii) = deunicode_char(c) else {
        return c;
    };
    let mut chars = ascii.chars();
    match (chars.next(), chars.next()) {
        (Some(base), None) if base.is_ascii_alphabetic() => base,
        _ => c,
    }
}

fn is_combining_mark(c: char) -> bool {
    matches!(
        c,
        '\u{300}'..='\u{36F}'
            | '\u{1AB0}'..='\u{1AFF}'
            | '\u{1DC0}'..='\u{1DFF}'
            | '\u{20D0}'..='\u{20FF}'
            | '\u{FE20}'..='\u{FE2F}'
    )
}

/// Returns `true` when both values are scalars of the same kind.
pub(crate) fn same_kind(a: &Value<'_>, b: &Value<'_>) -> bool {
    matches!(
        (a, b),
        (Value::String(_), Value::String(_))
            | (Value::Number(_), Value::Number(_))
            | (Value::Timestamp(_), Value::Timestamp(_))
            | (Value::Enum(_), Value::Enum(_))
            | (Value::Bool(_), Value::Bool(_))
    )
}

/// Natural order of two scalars of the same kind, after folding strings.
///
/// Returns `None` for different kinds, lists, missing values and NaN.
pub fn compare_scalars(a: &Value<'_>, b: &Value<'_>, options: Options) -> Option<Ordering> {
    match (a, b) {
        (Value::String(a), Value::String(b)) => Some(fold(a, options).cmp(&fold(b, options))),
        (Value::Number(a), Value::Number(b)) => a.compare(*b),
        (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
        (Value::Enum(a), Value::Enum(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Orders two literals; `None` when they are not of the same kind.
pub fn compare_literals(a: &Literal, b: &Literal) -> Option<Ordering> {
    compare_scalars(&a.as_value(), &b.as_value(), Options::NONE)
}

/// Value equality after folding. Values of different kinds are unequal and a
/// missing value equals nothing.
pub fn values_equal(a: &Value<'_>, b: &Value<'_>, options: Options) -> bool {
    compare_scalars(a, b, options) == Some(Ordering::Equal)
}

/// Matches `text` against a wildcard pattern anchored at both ends.
///
/// `*` matches any run of characters, including the empty run; `?` matches
/// exactly one character. Every other character matches itself.
pub fn like_match(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();

    let (mut t, mut p) = (0, 0);
    // Position of the last `*` seen and the text index it is currently
    // standing in for.
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some('*') => {
                backtrack = Some((p, t));
                p += 1;
            }
            Some(&c) if c == '?' || c == text[t] => {
                p += 1;
                t += 1;
            }
            _ => match backtrack {
                Some((star, consumed)) => {
                    p = star + 1;
                    t = consumed + 1;
                    backtrack = Some((star, consumed + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Field;
    use crate::predicate::{and, between, not, or};
    use crate::value::{Number, Timestamp};

    struct Person {
        name: Option<String>,
        age: i64,
        tags: Vec<String>,
        scores: Vec<u32>,
    }

    const NAME: Field<Person> = Field::new("name", |p| match &p.name {
        Some(name) => Value::String(name),
        None => Value::None,
    });
    const AGE: Field<Person> = Field::new("age", |p| Value::Number(Number::I64(p.age)));
    const TAGS: Field<Person> = Field::new("tags", |p| {
        Value::List(p.tags.iter().map(|t| Value::String(t)).collect())
    });
    const SCORES: Field<Person> = Field::new("scores", |p| {
        Value::List(p.scores.iter().map(|s| Value::Number(Number::from(*s))).collect())
    });

    fn person(name: &str, age: i64) -> Person {
        Person {
            name: Some(name.to_string()),
            age,
            tags: vec!["red".into(), "Yellow".into()],
            scores: vec![3, 7, 9],
        }
    }

    #[test]
    fn like_wildcards_are_anchored() {
        assert!(like_match("Foo", "F*"));
        assert!(!like_match("xFoo", "F*"));
        assert!(like_match("Foo", "F?o"));
        assert!(!like_match("Fooo", "F?o"));
        assert!(like_match("", "*"));
        assert!(!like_match("", "?"));
        assert!(like_match("abcabd", "*ab?"));
        assert!(like_match("mississippi", "m*iss*pi"));
        assert!(!like_match("mississippi", "m*iss*pix"));
        assert!(like_match("a*b", "a*b"));
    }

    #[test]
    fn folding() {
        assert_eq!(fold("Crème", Options::NONE), "Crème");
        assert_eq!(fold("Crème", Options::CASE_INSENSITIVE), "crème");
        assert_eq!(fold("Crème", Options::DIACRITIC_INSENSITIVE), "Creme");
        assert_eq!(
            fold("Crème", Options::CASE_INSENSITIVE | Options::DIACRITIC_INSENSITIVE),
            "creme"
        );
    }

    #[test]
    fn diacritic_folding_only_strips_marks() {
        let d = Options::DIACRITIC_INSENSITIVE;
        assert_eq!(fold("résumé", d), "resume");
        assert_eq!(fold("re\u{301}sume\u{301}", d), "resume");
        assert_eq!(fold("Øresund Łódź", d), "Oresund Lodz");
        assert_eq!(fold("Tiếng Việt", d), "Tieng Viet");
        assert_eq!(fold("Straße", d), "Straße");
        assert_eq!(fold("東京", d), "東京");
        assert_eq!(fold("Москва", d), "Москва");
        assert_eq!(fold("3×4", d), "3×4");
    }

    #[test]
    fn diacritic_insensitive_comparisons() {
        let d = Options::DIACRITIC_INSENSITIVE;
        let eq = |name: &str, operand: &str| {
            Comparison::new(NAME, Operator::EqualTo, operand)
                .unwrap()
                .options(d)
                .evaluate(&person(name, 1))
                .unwrap()
        };
        assert!(eq("résumé", "resume"));
        assert!(!eq("東京", "Dong Jing"));
        assert!(!eq("Москва", "Moskva"));

        let like = Comparison::new(NAME, Operator::Like, "Stra?e").unwrap().options(d);
        assert!(like.evaluate(&person("Straße", 1)).unwrap());
        assert!(like.evaluate(&person("Strase", 1)).unwrap());
    }

    #[test]
    fn equality_and_ordering() {
        let p = person("Foo", 30);
        assert!(NAME.equal_to("Foo").evaluate(&p).unwrap());
        assert!(!NAME.equal_to("foo").evaluate(&p).unwrap());
        assert!(NAME.not_equal_to("Bar").evaluate(&p).unwrap());
        assert!(AGE.greater_than(29).evaluate(&p).unwrap());
        assert!(AGE.greater_than_or_equal_to(30).evaluate(&p).unwrap());
        assert!(!AGE.less_than(30).evaluate(&p).unwrap());
        assert!(AGE.less_than_or_equal_to(30.0).evaluate(&p).unwrap());
    }

    #[test]
    fn options_fold_both_sides() {
        let p = person("Crème", 30);
        let cmp = Comparison::new(NAME, Operator::EqualTo, "CREME")
            .unwrap()
            .options(Options::CASE_INSENSITIVE | Options::DIACRITIC_INSENSITIVE);
        assert!(cmp.evaluate(&p).unwrap());

        let cmp = Comparison::new(NAME, Operator::BeginsWith, "crè")
            .unwrap()
            .options(Options::CASE_INSENSITIVE);
        assert!(cmp.evaluate(&p).unwrap());

        let cmp = Comparison::new(NAME, Operator::Like, "c?EME")
            .unwrap()
            .options(Options::CASE_INSENSITIVE | Options::DIACRITIC_INSENSITIVE);
        assert!(cmp.evaluate(&p).unwrap());
    }

    #[test]
    fn ordering_across_kinds_is_an_error() {
        let p = person("Foo", 30);
        let err = AGE.less_than("ten").evaluate(&p).unwrap_err();
        assert_eq!(
            err,
            Error::IncomparableTypes {
                field: "age",
                operator: Operator::LessThan,
                left: "number",
                right: "string",
            }
        );
        assert!(AGE.begins_with("3").evaluate(&p).is_err());
    }

    #[test]
    fn equality_across_kinds_is_false() {
        let p = person("Foo", 30);
        assert!(!AGE.equal_to("30").evaluate(&p).unwrap());
        assert!(AGE.not_equal_to("30").evaluate(&p).unwrap());
    }

    #[test]
    fn missing_values() {
        let mut p = person("Foo", 30);
        p.name = None;
        assert!(!NAME.equal_to("Foo").evaluate(&p).unwrap());
        assert!(NAME.not_equal_to("Foo").evaluate(&p).unwrap());
        assert!(!NAME.less_than("Z").evaluate(&p).unwrap());
        assert!(!NAME.like("*").evaluate(&p).unwrap());
        assert!(!NAME.is_in(["Foo"]).evaluate(&p).unwrap());
    }

    #[test]
    fn contains_checks_collection_elements() {
        let p = person("Foo", 30);
        assert!(TAGS.contains("red").evaluate(&p).unwrap());
        assert!(!TAGS.contains("yellow").evaluate(&p).unwrap());

        let folded = Comparison::new(TAGS, Operator::Contains, "yellow")
            .unwrap()
            .options(Options::CASE_INSENSITIVE);
        assert!(folded.evaluate(&p).unwrap());

        let mut empty = person("Foo", 30);
        empty.tags.clear();
        assert!(!TAGS.contains("red").evaluate(&empty).unwrap());
    }

    #[test]
    fn contains_on_strings_is_substring() {
        let p = person("Foobar", 30);
        assert!(NAME.contains("oba").evaluate(&p).unwrap());
        assert!(!NAME.contains("xyz").evaluate(&p).unwrap());
        assert!(AGE.contains(3).evaluate(&p).is_err());
    }

    #[test]
    fn in_checks_operand_membership() {
        let p = person("Foo", 30);
        assert!(NAME.is_in(["Foo", "Bar"]).evaluate(&p).unwrap());
        assert!(!NAME.is_in(["Baz"]).evaluate(&p).unwrap());
        assert!(!NAME.is_in(Vec::<String>::new()).evaluate(&p).unwrap());
    }

    #[test]
    fn between_is_inclusive() {
        let range = between(AGE, 10..=20).unwrap();
        assert!(range.evaluate(&person("a", 10)).unwrap());
        assert!(range.evaluate(&person("a", 20)).unwrap());
        assert!(range.evaluate(&person("a", 15)).unwrap());
        assert!(!range.evaluate(&person("a", 21)).unwrap());
        assert!(!range.evaluate(&person("a", 9)).unwrap());
    }

    #[test]
    fn any_and_all_modifiers() {
        let p = person("Foo", 30);
        let any = Comparison::new(SCORES, Operator::GreaterThan, 8)
            .unwrap()
            .modifier(Modifier::Any);
        assert!(any.evaluate(&p).unwrap());

        let all = Comparison::new(SCORES, Operator::GreaterThan, 2)
            .unwrap()
            .modifier(Modifier::All);
        assert!(all.evaluate(&p).unwrap());

        let mut low = person("Foo", 30);
        low.scores.push(1);
        assert!(!all.evaluate(&low).unwrap());

        let mut empty = person("Foo", 30);
        empty.scores.clear();
        assert!(all.evaluate(&empty).unwrap());
        assert!(!any.evaluate(&empty).unwrap());
    }

    #[test]
    fn modifier_shape_errors() {
        let p = person("Foo", 30);

        let any_on_scalar = Comparison::new(AGE, Operator::EqualTo, 30)
            .unwrap()
            .modifier(Modifier::Any);
        assert_eq!(
            any_on_scalar.evaluate(&p).unwrap_err(),
            Error::UnsupportedModifier {
                field: "age",
                modifier: Modifier::Any,
                found: "number",
            }
        );

        let direct_on_list = SCORES.greater_than(1);
        assert!(matches!(
            direct_on_list.evaluate(&p),
            Err(Error::UnsupportedModifier {
                modifier: Modifier::Direct,
                found: "list",
                ..
            })
        ));
    }

    #[test]
    fn compounds_and_negation() {
        let p = person("", 5);
        assert!(and(Vec::new()).evaluate(&p).unwrap());
        assert!(!or(Vec::new()).evaluate(&p).unwrap());

        let expr = not(or([NAME.equal_to(""), AGE.less_than(10)]));
        assert!(!expr.evaluate(&p).unwrap());
        assert!(expr.evaluate(&person("Foo", 30)).unwrap());
    }

    #[test]
    fn compounds_short_circuit() {
        let p = person("Foo", 30);
        let failing = AGE.less_than("x");
        assert!(failing.evaluate(&p).is_err());

        // The failing child is never reached.
        assert!(!and([AGE.less_than(0), failing.clone()]).evaluate(&p).unwrap());
        assert!(or([AGE.greater_than(0), failing.clone()]).evaluate(&p).unwrap());
        assert!(and([AGE.greater_than(0), failing]).evaluate(&p).is_err());
    }

    #[test]
    fn timestamps_and_enums() {
        struct Event {
            at: Timestamp,
            kind: u32,
        }
        let at: Field<Event> = Field::new("at", |e| Value::Timestamp(e.at));
        let kind: Field<Event> = Field::new("kind", |e| Value::Enum(e.kind));

        let e = Event {
            at: Timestamp(1_000),
            kind: 2,
        };
        assert!(at.less_than(Timestamp(2_000)).evaluate(&e).unwrap());
        assert!(kind.equal_to(Literal::Enum(2)).evaluate(&e).unwrap());
        assert!(kind
            .is_in([Literal::Enum(1), Literal::Enum(2)])
            .evaluate(&e)
            .unwrap());
    }

    #[test]
    fn scalar_comparisons() {
        assert_eq!(
            compare_scalars(&Value::String("a"), &Value::String("b"), Options::NONE),
            Some(Ordering::Less)
        );
        assert_eq!(
            compare_scalars(&Value::Bool(false), &Value::Bool(true), Options::NONE),
            Some(Ordering::Less)
        );
        assert_eq!(
            compare_scalars(&Value::String("a"), &Value::Number(Number::I64(1)), Options::NONE),
            None
        );
        assert_eq!(
            compare_literals(&Literal::from(1), &Literal::from(2.5)),
            Some(Ordering::Less)
        );
    }
}
