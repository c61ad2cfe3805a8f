//! Typed bindings for the KukuSwap farming contracts
//!
//! Generated at build time from `abi/*.json` by `kukugen`.
//!
//! - [`IKukuFarmer`]: farming interface (`deposit`, `poolInfo`,
//!   `totalAllocPoint`). Connect-only.
//! - [`SafeERC20`]: ERC20 safety library (`safeDecimals`). Ships bytecode,
//!   so [`SafeERC20Factory`] can deploy it.

#[allow(dead_code, unused_imports, clippy::all)]
pub mod i_kuku_farmer {
    include!(concat!(env!("OUT_DIR"), "/i_kuku_farmer.rs"));
}

#[allow(dead_code, unused_imports, clippy::all)]
pub mod safe_erc20 {
    include!(concat!(env!("OUT_DIR"), "/safe_erc20.rs"));
}

#[doc(hidden)]
#[allow(dead_code, unused_imports, clippy::all)]
pub mod reward_vault {
    include!(concat!(env!("OUT_DIR"), "/reward_vault.rs"));
}

pub use i_kuku_farmer::{IKukuFarmer, IKukuFarmerCalls, IKukuFarmerFactory, PoolInfo};
pub use safe_erc20::{SafeERC20, SafeERC20Calls, SafeERC20Factory};

/// Runtime types the bindings are built on
pub use kukugen::runtime;
