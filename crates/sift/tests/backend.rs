//! Backend adapters: in-memory execution and a translating adapter that walks
//! the public expression tree.

use std::cell::RefCell;

use sift::{
    Backend, Comparison, Config, Conjunction, ErrorPolicy, Literal, MemoryBackend, Operand,
    Operator, Predicate, Query, Record, Result,
};

#[derive(Debug, Clone, PartialEq, Record)]
struct Book {
    title: String,
    year: i64,
    genres: Vec<String>,
}

fn library() -> Vec<Book> {
    vec![
        Book {
            title: "Dune".into(),
            year: 1965,
            genres: vec!["scifi".into()],
        },
        Book {
            title: "Emma".into(),
            year: 1815,
            genres: vec!["romance".into(), "classic".into()],
        },
        Book {
            title: "Neuromancer".into(),
            year: 1984,
            genres: vec!["scifi".into(), "cyberpunk".into()],
        },
    ]
}

fn titles(books: &[Book]) -> Vec<&str> {
    books.iter().map(|b| b.title.as_str()).collect()
}

// ============================================================================
// In-memory backends
// ============================================================================

#[test]
fn memory_backend_executes_queries() {
    let store = MemoryBackend::new(library());
    let query = Query::filtered(Book::GENRES.contains("scifi")).ordered_by([Book::YEAR.desc()]);
    let found = store.execute(&query).unwrap();
    assert_eq!(titles(&found), ["Neuromancer", "Dune"]);
    assert_eq!(store.len(), 3);
}

#[test]
fn vec_and_slice_backends_agree_with_apply() {
    let books = library();
    let query = Query::filtered(Book::YEAR.greater_than(1900)).limit(1);

    let via_vec = books.execute(&query).unwrap();
    let via_slice = books.as_slice().execute(&query).unwrap();
    let via_apply = query.apply_cloned(&books).unwrap();
    assert_eq!(via_vec, via_apply);
    assert_eq!(via_slice, via_apply);
    assert_eq!(titles(&via_vec), ["Dune"]);
}

#[test]
fn backends_are_usable_as_trait_objects() {
    let stores: Vec<Box<dyn Backend<Book>>> = vec![
        Box::new(library()),
        Box::new(MemoryBackend::new(library())),
    ];
    let query = Query::filtered(Book::TITLE.ends_with("a"));
    for store in &stores {
        assert_eq!(titles(&store.execute(&query).unwrap()), ["Emma"]);
    }
}

#[test]
fn skip_policy_drops_failing_records() {
    let mut books = library();
    books.push(Book {
        title: "Untitled".into(),
        year: 2000,
        genres: vec![],
    });
    let store = MemoryBackend::new(books).with_config(Config {
        on_error: ErrorPolicy::Skip,
    });

    // Only the first record satisfies the left side; every other record
    // reaches the ill-typed comparison.
    let ill_typed: Predicate<Book> = Comparison::new(Book::YEAR, Operator::BeginsWith, "19")
        .unwrap()
        .into();
    let query = Query::filtered(Book::TITLE.equal_to("Dune") | ill_typed);
    assert_eq!(titles(&store.execute(&query).unwrap()), ["Dune"]);
    assert!(library().execute(&query).is_err());
}

// ============================================================================
// Translating backend
// ============================================================================

/// Renders expressions as SQL `WHERE` clauses and records what it sent.
///
/// Rows are served from an in-memory table once the filter translated, which
/// stands in for the remote round trip.
struct SqlBackend {
    table: Vec<Book>,
    sent: RefCell<Vec<String>>,
}

impl SqlBackend {
    fn new(table: Vec<Book>) -> Self {
        SqlBackend {
            table,
            sent: RefCell::new(Vec::new()),
        }
    }

    fn translate(predicate: &Predicate<Book>) -> Result<String> {
        match predicate {
            Predicate::Comparison(comparison) => Self::comparison(comparison),
            Predicate::Compound(compound) => {
                let children = compound
                    .children()
                    .iter()
                    .map(Self::translate)
                    .collect::<Result<Vec<_>>>()?;
                Ok(match (compound.kind(), children.is_empty()) {
                    (Conjunction::And, true) => "1 = 1".to_string(),
                    (Conjunction::Or, true) => "1 = 0".to_string(),
                    (Conjunction::And, false) => format!("({})", children.join(" AND ")),
                    (Conjunction::Or, false) => format!("({})", children.join(" OR ")),
                })
            }
            Predicate::Not(negation) => Ok(format!("NOT {}", Self::translate(negation.child())?)),
        }
    }

    fn comparison(comparison: &Comparison<Book>) -> Result<String> {
        let column = comparison.field().name();
        let unsupported = || sift::Error::UnsupportedOperator {
            backend: "sql",
            operator: comparison.operator(),
        };
        let sql = match (comparison.operator(), comparison.operand()) {
            (Operator::EqualTo, Operand::Scalar(v)) => format!("{column} = {}", literal(v)),
            (Operator::NotEqualTo, Operand::Scalar(v)) => format!("{column} <> {}", literal(v)),
            (Operator::LessThan, Operand::Scalar(v)) => format!("{column} < {}", literal(v)),
            (Operator::GreaterThan, Operand::Scalar(v)) => format!("{column} > {}", literal(v)),
            (Operator::Between, Operand::Range(lo, hi)) => {
                format!("{column} BETWEEN {} AND {}", literal(lo), literal(hi))
            }
            (Operator::In, Operand::List(items)) => {
                let items: Vec<String> = items.iter().map(literal).collect();
                format!("{column} IN ({})", items.join(", "))
            }
            _ => return Err(unsupported()),
        };
        Ok(sql)
    }
}

fn literal(value: &Literal) -> String {
    match value {
        Literal::String(s) => format!("'{}'", s.replace('\'', "''")),
        other => other.to_string(),
    }
}

impl Backend<Book> for SqlBackend {
    fn execute(&self, query: &Query<Book>) -> Result<Vec<Book>> {
        let mut sql = String::from("SELECT * FROM books");
        if let Some(predicate) = query.predicate() {
            sql.push_str(" WHERE ");
            sql.push_str(&Self::translate(predicate)?);
        }
        self.sent.borrow_mut().push(sql);
        query.apply_cloned(&self.table)
    }
}

#[test]
fn translating_backend_renders_native_filters() {
    let backend = SqlBackend::new(library());
    let query = Query::filtered(
        Book::YEAR.between(1900..=2000).unwrap() & !Book::TITLE.is_in(["Dune", "O'Neill"]),
    );

    let found = backend.execute(&query).unwrap();
    assert_eq!(titles(&found), ["Neuromancer"]);
    assert_eq!(
        backend.sent.borrow().as_slice(),
        ["SELECT * FROM books WHERE (year BETWEEN 1900 AND 2000 AND NOT title IN ('Dune', 'O''Neill'))"]
    );
}

#[test]
fn translating_backend_reports_unsupported_operators() {
    let backend = SqlBackend::new(library());
    let query = Query::filtered(Book::TITLE.like("D*") | Book::YEAR.equal_to(1815));

    let err = backend.execute(&query).unwrap_err();
    assert_eq!(
        err,
        sift::Error::UnsupportedOperator {
            backend: "sql",
            operator: Operator::Like,
        }
    );
    assert_eq!(err.to_string(), "operator 'LIKE' is not supported by the sql backend");
    assert!(backend.sent.borrow().is_empty());
}

#[test]
fn translating_backend_without_filter() {
    let backend = SqlBackend::new(library());
    let found = backend.execute(&Query::all().ordered_by([Book::TITLE.asc()])).unwrap();
    assert_eq!(titles(&found), ["Dune", "Emma", "Neuromancer"]);
    assert_eq!(backend.sent.borrow()[0], "SELECT * FROM books");
}
