/// The kind of error that occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The endpoint answered with a non-success HTTP status.
    Status(u16),
    /// The endpoint could not be reached, or the connection broke while
    /// reading the body.
    Transport,
    /// The endpoint answered, but the body has an unexpected shape.
    Parse,
}
