//! Signer / Submitter
//!
//! Signs an unsigned transaction as an EIP-155 legacy envelope with the
//! session key, submits the raw bytes and waits for the receipt. One send per
//! transaction: no retry, no gas bump, no resubmission.

use crate::chain::ChainClient;
use crate::error::{Result, TraderError};
use crate::session::TraderSession;
use crate::types::{SignedTransaction, TxReceipt, UnsignedTransaction};
use alloy::consensus::{SignableTransaction, TxEnvelope, TxLegacy};
use alloy::eips::eip2718::Encodable2718;
use alloy::network::TxSignerSync;
use alloy::primitives::TxKind;
use tracing::info;

/// Sign `tx` with the session key
pub fn sign_transaction(session: &TraderSession, tx: &UnsignedTransaction) -> Result<SignedTransaction> {
    if tx.from != session.account() {
        return Err(TraderError::Signing(format!(
            "transaction from {} but session key controls {}",
            tx.from,
            session.account()
        )));
    }

    if tx.chain_id != session.chain_id() {
        return Err(TraderError::Signing(format!(
            "transaction for chain {} but session is on chain {}",
            tx.chain_id,
            session.chain_id()
        )));
    }

    let mut legacy = TxLegacy {
        chain_id: Some(tx.chain_id),
        nonce: tx.nonce,
        gas_price: tx.gas_price,
        gas_limit: tx.gas_limit,
        to: TxKind::Call(tx.to),
        value: tx.value,
        input: tx.input.clone(),
    };

    let signature = TxSignerSync::sign_transaction_sync(session.signer(), &mut legacy)
        .map_err(|e| TraderError::Signing(e.to_string()))?;

    let signed = legacy.into_signed(signature);
    let hash = *signed.hash();
    let envelope: TxEnvelope = signed.into();

    Ok(SignedTransaction {
        hash,
        raw: envelope.encoded_2718().into(),
    })
}

/// Sign, submit and wait for inclusion of `tx`
pub async fn sign_and_send<C: ChainClient + ?Sized>(
    client: &C,
    session: &TraderSession,
    tx: &UnsignedTransaction,
) -> Result<TxReceipt> {
    let signed = sign_transaction(session, tx)?;

    let tx_hash = client.send_raw(signed.raw).await?;
    info!("Transaction submitted: {:?} (nonce {})", tx_hash, tx.nonce);

    let receipt = client.wait_for_receipt(tx_hash).await?;
    info!(
        "Transaction mined: {:?} | block {:?} | gas used {} | status {}",
        receipt.transaction_hash,
        receipt.block_number,
        receipt.gas_used,
        if receipt.success { "success" } else { "reverted" }
    );

    Ok(receipt)
}
