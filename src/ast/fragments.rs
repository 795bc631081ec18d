/// A raw fragment produced by the template scanner.
///
/// Fragments partition the template text: concatenating the text runs,
/// comment bodies, and `<? ... ?>`-delimited directive bodies (with their
/// markers restored) reproduces the input.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// Literal SQL text, including any quoted string literals it contains
    ///
    /// # Examples
    /// ```text
    /// SELECT * FROM t WHERE name = 'O''Hara'
    /// ```
    Text(String),

    /// A SQL comment, either `-- ...` (to end of line) or `/* ... */`
    ///
    /// The body keeps its delimiters; the evaluator later collapses the
    /// whole comment to a single space.
    Comment(String),

    /// The body of a `<? ... ?>` directive, markers stripped
    ///
    /// # Examples
    /// ```text
    /// value("cust_id")
    /// if not exists("status")
    /// endforeach
    /// ```
    Directive(String),
}
