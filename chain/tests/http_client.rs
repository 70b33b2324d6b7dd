use serde_json::json;
use std::time::Duration;
use votechain_chain::{
    ChainClient, ChainError, ElectionContract, HttpChainClient, ReceiptStatus, RpcTransport, TxHandle,
};
use votechain_nullables::StubNode;
use votechain_types::{ElectionId, TxHash, WalletAddress};

const CONTRACT: &str = "0xcccccccccccccccccccccccccccccccccccccccc";

fn client(node: &StubNode) -> HttpChainClient {
    let transport = RpcTransport::new(node.url(), Duration::from_secs(5)).unwrap();
    HttpChainClient::new(
        transport,
        WalletAddress::parse(CONTRACT).unwrap(),
        Duration::from_millis(10),
    )
}

fn receipt_json(hash: &TxHash, status: &str) -> serde_json::Value {
    json!({ "result": { "hash": hash.to_string(), "block_number": 7, "status": status } })
}

#[tokio::test]
async fn receipt_polling_waits_through_pending_answers() {
    let hash = TxHash::new([0xab; 32]);
    let node = StubNode::start(vec![
        json!({ "result": null }),
        json!({ "result": null }),
        receipt_json(&hash, "success"),
    ])
    .await
    .unwrap();

    let receipt = client(&node)
        .wait_for_receipt(&TxHandle::new(hash))
        .await
        .unwrap();

    assert_eq!(receipt.tx_hash, hash);
    assert_eq!(receipt.block_number, 7);
    assert!(receipt.succeeded());
    assert_eq!(node.request_count(), 3);
    for request in node.requests() {
        assert_eq!(request["action"], "transaction_receipt");
        assert_eq!(request["hash"], hash.to_string());
    }
}

#[tokio::test]
async fn reverted_receipt_is_returned_not_retried() {
    let hash = TxHash::new([0x11; 32]);
    let node = StubNode::start(vec![receipt_json(&hash, "reverted")]).await.unwrap();

    let receipt = client(&node)
        .wait_for_receipt(&TxHandle::new(hash))
        .await
        .unwrap();

    assert_eq!(receipt.status, ReceiptStatus::Reverted);
    assert_eq!(node.request_count(), 1);
}

#[tokio::test]
async fn node_error_stops_polling() {
    let node = StubNode::start(vec![
        json!({ "result": null }),
        json!({ "error": "unknown transaction" }),
    ])
    .await
    .unwrap();

    let err = client(&node)
        .wait_for_receipt(&TxHandle::new(TxHash::new([0x22; 32])))
        .await
        .unwrap_err();

    assert!(matches!(err, ChainError::Node(ref m) if m == "unknown transaction"));
    assert_eq!(node.request_count(), 2);
}

#[tokio::test]
async fn contract_read_targets_configured_contract() {
    let node = StubNode::start(vec![json!({ "result": ["Board", "", 10, 20, CONTRACT] })])
        .await
        .unwrap();

    let value = client(&node)
        .read(ElectionContract::election_call(ElectionId::new(4)))
        .await
        .unwrap();

    assert_eq!(value[0], "Board");
    assert_eq!(
        node.requests(),
        vec![json!({
            "action": "contract_read",
            "address": CONTRACT,
            "function": ElectionContract::GET_ELECTION,
            "args": [4],
        })]
    );
}
