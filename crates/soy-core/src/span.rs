pub type FileId = u64;

/// Byte range inside a parsed template file. Statements and expressions
/// carry one so fatal analysis errors can point at the offending
/// construct; nodes built programmatically keep the null span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Span {
    pub file: FileId,
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(file: FileId, start: u32, end: u32) -> Span {
        Span { file, start, end }
    }

    /// Placeholder for nodes without a source position.
    pub fn null() -> Span {
        Span {
            file: 0,
            start: 0,
            end: 0,
        }
    }

    pub fn is_null(self) -> bool {
        self == Span::null()
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_null() {
            write!(f, "<unknown>")
        } else {
            write!(f, "file {}, bytes {}..{}", self.file, self.start, self.end)
        }
    }
}
