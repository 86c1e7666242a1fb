//! Contract Definitions
//!
//! Solidity interfaces the trader depends on, defined with alloy's `sol!`
//! macro. Only calldata types are generated; all RPC goes through
//! [`crate::chain::ChainClient`], so no `#[sol(rpc)]` instances are needed.
//!
//! Signatures are fixed, versioned external contracts. A router that does not
//! match them is a configuration error, not something handled at runtime.
//!
//! Created: 2026-10-18

use alloy::sol;

// ── ERC20 ─────────────────────────────────────────────────────────────

sol! {
    interface IERC20 {
        function approve(address spender, uint256 amount) external returns (bool);
        function decimals() external view returns (uint8);
    }
}

// ── Uniswap V2 Router (and forks: SushiSwap, PancakeSwap) ────────────

sol! {
    interface IUniswapV2Router02 {
        function getAmountsOut(uint256 amountIn, address[] calldata path) external view returns (uint256[] memory amounts);
        function swapExactETHForTokens(uint256 amountOutMin, address[] calldata path, address to, uint256 deadline) external payable returns (uint256[] memory amounts);
        function swapExactTokensForETH(uint256 amountIn, uint256 amountOutMin, address[] calldata path, address to, uint256 deadline) external returns (uint256[] memory amounts);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::sol_types::SolCall;

    #[test]
    fn test_router_selectors() {
        // Well-known V2 router selectors
        assert_eq!(
            IUniswapV2Router02::swapExactETHForTokensCall::SELECTOR,
            [0x7f, 0xf3, 0x6a, 0xb5]
        );
        assert_eq!(
            IUniswapV2Router02::swapExactTokensForETHCall::SELECTOR,
            [0x18, 0xcb, 0xaf, 0xe5]
        );
        assert_eq!(
            IUniswapV2Router02::getAmountsOutCall::SELECTOR,
            [0xd0, 0x6c, 0xa6, 0x1f]
        );
    }

    #[test]
    fn test_erc20_selectors() {
        assert_eq!(IERC20::approveCall::SELECTOR, [0x09, 0x5e, 0xa7, 0xb3]);
        assert_eq!(IERC20::decimalsCall::SELECTOR, [0x31, 0x3c, 0xe5, 0x67]);
    }
}
