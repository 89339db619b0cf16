pub(crate) mod explain;
pub(crate) mod forms;
pub(crate) mod list;
pub(crate) mod record;
pub(crate) mod submit;
