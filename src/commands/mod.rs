pub mod canonical;
pub mod migrate;
pub mod scan;

pub type CmdResult<T> = rehost::Result<(T, i32)>;

pub(crate) struct GlobalArgs {}
