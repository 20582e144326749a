//! Contract bindings for Compound v2 cTokens and their ERC-20 underlyings.
//!
//! Only the functions the adapter calls are bound.

#![allow(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]

use ethers::contract::abigen;

abigen!(
    CToken,
    r#"[
        function supplyRatePerBlock() external view returns (uint256)
        function borrowRatePerBlock() external view returns (uint256)
        function mint(uint256 mintAmount) external returns (uint256)
        function borrow(uint256 borrowAmount) external returns (uint256)
        function repayBorrow(uint256 repayAmount) external returns (uint256)
    ]"#
);

abigen!(
    Erc20,
    r#"[
        function allowance(address owner, address spender) external view returns (uint256)
        function approve(address spender, uint256 amount) external returns (bool)
    ]"#
);
