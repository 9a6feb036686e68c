mod flag;
pub use flag::CacheFlag;

mod identity;
pub use identity::TaskIdentity;

mod property;
pub use property::{DataType, Direction, Property};

mod pool;
pub use pool::VarPool;

mod globals;
pub use globals::GlobalParams;

mod labels;
pub use labels::Labels;

mod constants;
pub use constants::{LABEL_PROVIDER, PARAM_SEPARATOR};
