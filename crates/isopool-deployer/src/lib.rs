// Deployment orchestration
//
// The two deployers and the parameter parser. Both deployers are pure
// orchestration over the `LendingSdk` boundary: validate, submit, surface
// whatever the chain said. Neither retries nor caches, and the pool deployer
// must run before the asset deployer: the asset side takes a `PoolHandle`,
// which only a pool deployment or a directory lookup can produce.

pub mod asset;
pub mod params;
pub mod pool;

pub use asset::{AssetDeployer, BatchError, BatchPolicy};
pub use params::parse_market_spec;
pub use pool::PoolDeployer;
