// Chain boundary for the isopool deployment harness
//
// Everything that talks to a node lives here: the JSON-RPC transport, the
// small ABI surface the protocol calls need, the `LendingSdk` trait the
// deployers drive, the directory-backed implementation, and an in-memory
// mock for tests.

pub mod abi;
pub mod context;
pub mod directory;
pub mod mock;
pub mod rpc;
pub mod sdk;

pub use context::ChainContext;
pub use directory::DirectorySdk;
pub use mock::{DeployedMarket, MockSdk};
pub use rpc::JsonRpcClient;
pub use sdk::{
    InterestRateModelConf, IrmRegistry, LendingSdk, JUMP_RATE_MODEL, WHITE_PAPER_MODEL,
};
