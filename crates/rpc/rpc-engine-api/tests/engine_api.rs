//! End-to-end tests of the engine server against a mock chain store and a
//! scripted importer.

use alloy_primitives::{Address, B256, U256, U64};
use assert_matches::assert_matches;
use ember_beacon_consensus::{engine_channel, BeaconImportQueue, BeaconReply, CriticalImportError};
use ember_payload_builder::BlockBuilderFunc;
use ember_primitives::{
    proofs, BlobSidecar, Block, BlockWithReceipts, Bytes, ChainSpec, Header, Receipt, Signature,
    Transaction, TransactionSigned, TxEip4844, Withdrawals,
};
use ember_provider::{test_utils::generators, InMemoryChainStore};
use ember_rpc_api::EngineApiServer;
use ember_rpc_engine_api::{EngineServer, CAPABILITIES};
use ember_rpc_types::engine::{
    ExecutionPayload, ForkchoiceState, PayloadAttributes, PayloadId, PayloadStatusEnum,
    TransitionConfiguration,
};
use ember_rpc_types_compat::engine::block_to_payload;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;

const UNKNOWN_PAYLOAD_CODE: i32 = -38001;
const INVALID_PAYLOAD_ATTRIBUTES_CODE: i32 = -38003;
const TOO_LARGE_REQUEST_CODE: i32 = -38004;
const INVALID_PARAMS_CODE: i32 = -32602;

fn pos_spec() -> Arc<ChainSpec> {
    Arc::new(ChainSpec {
        chain_id: 1337,
        terminal_total_difficulty: Some(U256::from(100)),
        shanghai_time: Some(0),
        cancun_time: None,
    })
}

struct TestEnv {
    server: EngineServer<InMemoryChainStore>,
    store: InMemoryChainStore,
    queue: Option<BeaconImportQueue>,
    builds: Arc<AtomicUsize>,
}

impl TestEnv {
    fn new(chain_spec: Arc<ChainSpec>, proposing: bool) -> Self {
        Self::with_built_block(chain_spec, proposing, BlockWithReceipts::default())
    }

    fn with_built_block(
        chain_spec: Arc<ChainSpec>,
        proposing: bool,
        built: BlockWithReceipts,
    ) -> Self {
        let (handle, queue) = engine_channel();
        let store = InMemoryChainStore::default();
        let builds = Arc::new(AtomicUsize::new(0));
        let counter = builds.clone();
        let builder_func: BlockBuilderFunc =
            Arc::new(move |_params, _interrupt| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(built.clone())
            });
        let server =
            EngineServer::new(chain_spec, store.clone(), handle, builder_func, proposing);
        Self { server, store, queue: Some(queue), builds }
    }

    /// Marks the importer post-merge and parks it on the queue, answering
    /// every request with the given status.
    fn spawn_importer(&mut self, status: PayloadStatusEnum) -> Arc<AtomicUsize> {
        let mut queue = self.queue.take().expect("importer already running");
        queue.set_pos_sync(true);
        let requests = Arc::new(AtomicUsize::new(0));
        let seen = requests.clone();
        tokio::spawn(async move {
            while let Some(request) = queue.next_request().await {
                seen.fetch_add(1, Ordering::SeqCst);
                let hash = match &request {
                    ember_beacon_consensus::BeaconRequest::NewPayload(block) => block.hash(),
                    ember_beacon_consensus::BeaconRequest::ForkChoice(state) => {
                        state.head_block_hash
                    }
                };
                let status = ember_rpc_types::engine::PayloadStatus {
                    status: status.clone(),
                    latest_valid_hash: Some(hash),
                };
                queue.send_reply(BeaconReply::Status(status)).await;
            }
        });
        requests
    }

    /// Asserts that nothing was ever enqueued for the importer. Only valid
    /// while the importer task has not been spawned.
    async fn assert_importer_untouched(&mut self) {
        let queue = self.queue.as_mut().expect("importer running");
        let outcome = tokio::time::timeout(Duration::from_millis(50), queue.next_request()).await;
        assert!(outcome.is_err(), "importer request queue was not empty");
    }
}

/// A canonical head block with a fixed timestamp, wired into the store.
fn install_head(store: &InMemoryChainStore, timestamp: u64) -> ember_primitives::SealedBlock {
    let mut rng = generators::rng();
    let mut head = generators::random_block(&mut rng, 10, None, 0).unseal();
    head.header.timestamp = timestamp;
    let head = head.seal_slow();

    store.insert_block(head.clone());
    store.set_canonical_hash(head.header.number, head.hash());
    store.set_head_block_hash(head.hash());
    head
}

/// A random block carrying an empty withdrawals list, valid for post-Shanghai
/// `newPayloadV2` submissions.
fn shanghai_block(
    rng: &mut impl rand::Rng,
    number: u64,
    parent: Option<B256>,
    timestamp: u64,
) -> ember_primitives::SealedBlock {
    let mut block = generators::random_block(rng, number, parent, 0).unseal();
    block.header.timestamp = timestamp;
    block.withdrawals = Some(Withdrawals::default());
    block.header.withdrawals_root = Some(proofs::calculate_withdrawals_root(&[]));
    block.seal_slow()
}

fn build_attributes(timestamp: u64) -> PayloadAttributes {
    PayloadAttributes {
        timestamp,
        prev_randao: B256::repeat_byte(0x11),
        suggested_fee_recipient: Address::repeat_byte(0xab),
        withdrawals: Some(vec![]),
    }
}

fn forkchoice(head: B256) -> ForkchoiceState {
    ForkchoiceState {
        head_block_hash: head,
        safe_block_hash: B256::repeat_byte(0x55),
        finalized_block_hash: B256::repeat_byte(0x66),
    }
}

// S1: a payload whose stated hash disagrees with its contents is rejected as
// INVALID_BLOCK_HASH without engaging the importer.
#[tokio::test]
async fn new_payload_rejects_wrong_block_hash() {
    let mut env = TestEnv::new(pos_spec(), false);
    let mut rng = generators::rng();

    let mut payload = block_to_payload(&generators::random_block(&mut rng, 5, None, 1));
    payload.withdrawals = Some(vec![]);
    payload.block_hash = B256::repeat_byte(0xaa);

    let status = env.server.new_payload_v2(payload).await.unwrap();
    assert_matches!(
        status.status,
        PayloadStatusEnum::InvalidBlockHash { validation_error } if validation_error == "invalid block hash"
    );
    env.assert_importer_untouched().await;
}

// S2: a block whose parent sits below the terminal total difficulty is
// INVALID with a zeroed latest valid hash.
#[tokio::test]
async fn new_payload_rejects_pre_ttd_block() {
    let spec = Arc::new(ChainSpec {
        terminal_total_difficulty: Some(U256::from(100)),
        ..ChainSpec::default()
    });
    let mut env = TestEnv::new(spec, false);
    let mut rng = generators::rng();

    let parent = generators::random_block(&mut rng, 41, None, 0);
    env.store.insert_block(parent.clone());
    env.store.set_total_difficulty(parent.hash(), U256::from(99));

    let child = generators::random_block(&mut rng, 42, Some(parent.hash()), 0);
    let status = env.server.new_payload_v2(block_to_payload(&child)).await.unwrap();

    assert_matches!(status.status, PayloadStatusEnum::Invalid { validation_error: None });
    assert_eq!(status.latest_valid_hash, Some(B256::ZERO));
    env.assert_importer_untouched().await;
}

// S3: two forkchoice updates with identical attributes share one builder and
// one payload id.
#[tokio::test]
async fn duplicate_build_requests_are_deduplicated() {
    let mut env = TestEnv::new(pos_spec(), true);
    let head = install_head(&env.store, 1_700_000_000);
    env.spawn_importer(PayloadStatusEnum::Valid);

    let state = forkchoice(head.hash());
    let attributes = build_attributes(1_700_000_012);

    let first = env
        .server
        .fork_choice_updated_v2(state, Some(attributes.clone()))
        .await
        .unwrap();
    assert!(first.payload_status.is_valid());
    assert_eq!(first.payload_id, Some(PayloadId::new(1)));

    let second = env.server.fork_choice_updated_v2(state, Some(attributes)).await.unwrap();
    assert!(second.payload_status.is_valid());
    assert_eq!(second.payload_id, Some(PayloadId::new(1)));

    assert_eq!(env.builds.load(Ordering::SeqCst), 1);
}

// S4: a forkchoice head that is canonical but not the current head must not
// start a build.
#[tokio::test]
async fn side_branch_head_suppresses_build() {
    let mut env = TestEnv::new(pos_spec(), true);
    let mut rng = generators::rng();

    // ancestor canonical at 5, current head elsewhere
    let ancestor = generators::random_block(&mut rng, 5, None, 0);
    env.store.insert_block(ancestor.clone());
    env.store.set_canonical_hash(5, ancestor.hash());
    install_head(&env.store, 1_700_000_000);

    // the fast path answers; the importer only needs its pos-sync flag
    env.queue.as_ref().unwrap().set_pos_sync(true);

    let response = env
        .server
        .fork_choice_updated_v2(forkchoice(ancestor.hash()), Some(build_attributes(1_700_000_012)))
        .await
        .unwrap();

    assert!(response.payload_status.is_valid());
    assert_eq!(response.payload_status.latest_valid_hash, Some(ancestor.hash()));
    assert_eq!(response.payload_id, None);
    assert_eq!(env.builds.load(Ordering::SeqCst), 0);
    env.assert_importer_untouched().await;
}

// S5: an oversized range request fails with TOO_LARGE_REQUEST.
#[tokio::test]
async fn too_large_bodies_range_is_refused() {
    let env = TestEnv::new(pos_spec(), false);
    let error = env
        .server
        .get_payload_bodies_by_range_v1(U64::from(1), U64::from(1025))
        .await
        .unwrap_err();
    assert_eq!(error.code(), TOO_LARGE_REQUEST_CODE);

    let hashes = vec![B256::ZERO; 1025];
    let error = env.server.get_payload_bodies_by_hash_v1(hashes).await.unwrap_err();
    assert_eq!(error.code(), TOO_LARGE_REQUEST_CODE);
}

// S6: a forkchoice state equal to the persisted triple is answered from the
// fast path.
#[tokio::test]
async fn repeated_forkchoice_short_circuits() {
    let mut env = TestEnv::new(pos_spec(), false);
    let head = B256::repeat_byte(0x1f);
    let safe = B256::repeat_byte(0x2f);
    let finalized = B256::repeat_byte(0x3f);
    env.store.set_forkchoice(head, safe, finalized);

    let state = ForkchoiceState {
        head_block_hash: head,
        safe_block_hash: safe,
        finalized_block_hash: finalized,
    };
    let response = env.server.fork_choice_updated_v2(state, None).await.unwrap();

    assert!(response.payload_status.is_valid());
    assert_eq!(response.payload_status.latest_valid_hash, Some(head));
    assert_eq!(response.payload_id, None);
    env.assert_importer_untouched().await;
}

// Invariants 4 and 5: payload ids increase strictly, and the registry holds
// at most MAX_BUILDERS entries, evicting the numerically oldest.
#[tokio::test]
async fn payload_ids_are_monotonic_and_old_builders_are_evicted() {
    let mut env = TestEnv::new(pos_spec(), true);
    let head = install_head(&env.store, 1_700_000_000);
    env.spawn_importer(PayloadStatusEnum::Valid);

    let state = forkchoice(head.hash());
    let mut last_id = 0;
    for i in 0..130u64 {
        let response = env
            .server
            .fork_choice_updated_v2(state, Some(build_attributes(1_700_000_001 + i)))
            .await
            .unwrap();
        let id = response.payload_id.expect("build started").as_u64();
        assert!(id > last_id, "payload ids must increase strictly");
        last_id = id;
    }
    assert_eq!(last_id, 130);
    assert_eq!(env.builds.load(Ordering::SeqCst), 130);

    // ids 1 and 2 were evicted to make room, the rest are retrievable
    let error = env.server.get_payload_v2(PayloadId::new(1)).await.unwrap_err();
    assert_eq!(error.code(), UNKNOWN_PAYLOAD_CODE);
    let error = env.server.get_payload_v2(PayloadId::new(2)).await.unwrap_err();
    assert_eq!(error.code(), UNKNOWN_PAYLOAD_CODE);
    assert!(env.server.get_payload_v2(PayloadId::new(3)).await.is_ok());
    assert!(env.server.get_payload_v2(PayloadId::new(130)).await.is_ok());
}

#[tokio::test]
async fn bodies_by_hash_returns_null_for_unknown_blocks() {
    let env = TestEnv::new(pos_spec(), false);
    let mut rng = generators::rng();

    let known = generators::random_block(&mut rng, 1, None, 2);
    env.store.insert_block(known.clone());

    let bodies = env
        .server
        .get_payload_bodies_by_hash_v1(vec![known.hash(), B256::repeat_byte(0x77)])
        .await
        .unwrap();

    assert_eq!(bodies.len(), 2);
    let body = bodies[0].as_ref().unwrap();
    assert_eq!(body.transactions, known.raw_transactions());
    assert!(body.withdrawals.is_none());
    assert!(bodies[1].is_none());
}

// Invariant 6: the range result is compact and truncated at the first gap in
// canonical history.
#[tokio::test]
async fn bodies_by_range_stops_at_canonical_gap() {
    let env = TestEnv::new(pos_spec(), false);
    let mut rng = generators::rng();

    for number in [1u64, 2, 3, 5] {
        let block = generators::random_block(&mut rng, number, None, 1);
        env.store.insert_block(block.clone());
        env.store.set_canonical_hash(number, block.hash());
    }

    let bodies = env
        .server
        .get_payload_bodies_by_range_v1(U64::from(1), U64::from(5))
        .await
        .unwrap();
    assert_eq!(bodies.len(), 3);
    assert!(bodies.iter().all(Option::is_some));

    let error = env
        .server
        .get_payload_bodies_by_range_v1(U64::from(0), U64::from(5))
        .await
        .unwrap_err();
    assert_eq!(error.code(), INVALID_PARAMS_CODE);
    let error = env
        .server
        .get_payload_bodies_by_range_v1(U64::from(1), U64::from(0))
        .await
        .unwrap_err();
    assert_eq!(error.code(), INVALID_PARAMS_CODE);
}

#[tokio::test]
async fn transition_configuration_checks_terminal_total_difficulty() {
    let env = TestEnv::new(pos_spec(), false);

    let valid = TransitionConfiguration {
        terminal_total_difficulty: U256::from(100),
        terminal_block_hash: B256::repeat_byte(1),
        terminal_block_number: 7,
    };
    let response = env.server.exchange_transition_configuration_v1(valid).await.unwrap();
    assert_eq!(response.terminal_total_difficulty, U256::from(100));
    assert_eq!(response.terminal_block_hash, B256::ZERO);
    assert_eq!(response.terminal_block_number, 0);

    let mismatched = TransitionConfiguration {
        terminal_total_difficulty: U256::from(101),
        ..Default::default()
    };
    let error =
        env.server.exchange_transition_configuration_v1(mismatched).await.unwrap_err();
    assert!(error.message().contains("wrong terminal total difficulty"));

    let pow_env = TestEnv::new(Arc::new(ChainSpec::default()), false);
    let error = pow_env
        .server
        .exchange_transition_configuration_v1(TransitionConfiguration::default())
        .await
        .unwrap_err();
    assert!(error.message().contains("terminal total difficulty"));
}

#[tokio::test]
async fn exchange_capabilities_returns_server_list() {
    let env = TestEnv::new(pos_spec(), false);
    let list = env
        .server
        .exchange_capabilities(vec!["engine_newPayloadV7".to_string()])
        .await
        .unwrap();
    assert_eq!(list.len(), CAPABILITIES.len());
    assert!(list.contains(&"engine_getPayloadBodiesByRangeV1".to_string()));
}

#[tokio::test]
async fn fork_gated_fields_are_version_checked() {
    // Shanghai active from 0, Cancun never
    let env = TestEnv::new(pos_spec(), false);
    let mut rng = generators::rng();
    let block = generators::random_block(&mut rng, 1, None, 0);

    // withdrawals are forbidden in V1
    let mut payload = block_to_payload(&block);
    payload.withdrawals = Some(vec![]);
    let error = env.server.new_payload_v1(payload).await.unwrap_err();
    assert_eq!(error.code(), INVALID_PARAMS_CODE);
    assert!(error.message().contains("withdrawals"));

    // Shanghai is active, so V2 requires the list
    let payload = block_to_payload(&block);
    let error = env.server.new_payload_v2(payload).await.unwrap_err();
    assert_eq!(error.code(), INVALID_PARAMS_CODE);
    assert_eq!(error.message(), "missing withdrawals list");

    // data-gas fields are forbidden below V3
    let mut payload = block_to_payload(&block);
    payload.withdrawals = Some(vec![]);
    payload.data_gas_used = Some(0);
    payload.excess_data_gas = Some(0);
    let error = env.server.new_payload_v2(payload).await.unwrap_err();
    assert_eq!(error.code(), INVALID_PARAMS_CODE);

    // Cancun is not active on this chain, so V3 must not carry them either
    let mut payload = block_to_payload(&block);
    payload.withdrawals = Some(vec![]);
    payload.data_gas_used = Some(0);
    payload.excess_data_gas = Some(0);
    let error = env.server.new_payload_v3(payload).await.unwrap_err();
    assert_eq!(error.code(), INVALID_PARAMS_CODE);
    assert_eq!(error.message(), "dataGasUsed/excessDataGas present before Cancun");

    // pre-Shanghai chains reject withdrawals in V2
    let pre_shanghai = Arc::new(ChainSpec {
        terminal_total_difficulty: Some(U256::from(100)),
        ..ChainSpec::default()
    });
    let env = TestEnv::new(pre_shanghai, false);
    let mut payload = block_to_payload(&block);
    payload.withdrawals = Some(vec![]);
    let error = env.server.new_payload_v2(payload).await.unwrap_err();
    assert_eq!(error.code(), INVALID_PARAMS_CODE);
    assert_eq!(error.message(), "withdrawals before shanghai");
}

#[tokio::test]
async fn invalid_block_number_reports_bad_header() {
    let mut env = TestEnv::new(pos_spec(), false);
    let mut rng = generators::rng();
    env.queue.as_ref().unwrap().set_pos_sync(true);

    let parent = generators::random_block(&mut rng, 40, None, 0);
    env.store.insert_block(parent.clone());

    // block number jumps by 5
    let child = shanghai_block(&mut rng, 45, Some(parent.hash()), 1_700_000_010);

    let payload = block_to_payload(&child);
    let status = env.server.new_payload_v2(payload.clone()).await.unwrap();
    assert_matches!(
        &status.status,
        PayloadStatusEnum::Invalid { validation_error: Some(message) } if message == "invalid block number"
    );
    assert_eq!(status.latest_valid_hash, Some(parent.hash()));

    // the hash is now remembered as bad and short-circuits without the
    // number check
    let status = env.server.new_payload_v2(payload).await.unwrap();
    assert_matches!(&status.status, PayloadStatusEnum::Invalid { validation_error: None });
    assert_eq!(status.latest_valid_hash, Some(parent.hash()));
    env.assert_importer_untouched().await;
}

#[tokio::test]
async fn pre_pos_sync_answers_syncing() {
    let mut env = TestEnv::new(pos_spec(), false);
    let mut rng = generators::rng();

    // pos_sync stays false
    let payload = block_to_payload(&shanghai_block(&mut rng, 1, None, 1_700_000_000));
    let status = env.server.new_payload_v2(payload).await.unwrap();
    assert!(status.is_syncing());
    env.assert_importer_untouched().await;
}

#[tokio::test]
async fn busy_stage_loop_answers_syncing() {
    let env = TestEnv::new(pos_spec(), false);
    let head = install_head(&env.store, 1_700_000_000);

    // post-merge, but nobody ever drains the queue: the busy probe times out
    env.queue.as_ref().unwrap().set_pos_sync(true);

    let response =
        env.server.fork_choice_updated_v2(forkchoice(head.hash()), None).await.unwrap();
    assert!(response.payload_status.is_syncing());
}

#[tokio::test]
async fn critical_importer_error_surfaces_as_rpc_error() {
    let mut env = TestEnv::new(pos_spec(), false);
    let head = install_head(&env.store, 1_700_000_000);

    let mut queue = env.queue.take().unwrap();
    queue.set_pos_sync(true);
    tokio::spawn(async move {
        while let Some(_request) = queue.next_request().await {
            queue
                .send_reply(BeaconReply::Critical(CriticalImportError::new("stage loop wedged")))
                .await;
        }
    });

    let error =
        env.server.fork_choice_updated_v2(forkchoice(head.hash()), None).await.unwrap_err();
    assert_eq!(error.message(), "stage loop wedged");
}

#[tokio::test]
async fn stale_build_attributes_are_refused() {
    let mut env = TestEnv::new(pos_spec(), true);
    let head = install_head(&env.store, 1_700_000_000);
    env.spawn_importer(PayloadStatusEnum::Valid);

    // the timestamp does not advance past the head
    let error = env
        .server
        .fork_choice_updated_v2(forkchoice(head.hash()), Some(build_attributes(1_700_000_000)))
        .await
        .unwrap_err();
    assert_eq!(error.code(), INVALID_PAYLOAD_ATTRIBUTES_CODE);
    assert_eq!(env.builds.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn proposer_disabled_refuses_build_and_get_payload() {
    let mut env = TestEnv::new(pos_spec(), false);
    let head = install_head(&env.store, 1_700_000_000);
    env.spawn_importer(PayloadStatusEnum::Valid);

    let error = env
        .server
        .fork_choice_updated_v2(forkchoice(head.hash()), Some(build_attributes(1_700_000_012)))
        .await
        .unwrap_err();
    assert!(error.message().contains("not running as a proposer"));

    let error = env.server.get_payload_v2(PayloadId::new(1)).await.unwrap_err();
    assert!(error.message().contains("not running as a proposer"));
}

/// A built block with one blob transaction (two blobs) and one receipt, for
/// the getPayload response assembly tests.
fn built_block_with_blobs() -> BlockWithReceipts {
    let sidecar = BlobSidecar {
        blobs: vec![Bytes::from_static(b"blob-0"), Bytes::from_static(b"blob-1")],
        commitments: vec![Bytes::from_static(b"commitment-0"), Bytes::from_static(b"commitment-1")],
        proofs: vec![Bytes::from_static(b"proof-0"), Bytes::from_static(b"proof-1")],
    };
    let transaction = TransactionSigned::from_transaction_and_signature(
        Transaction::Eip4844(TxEip4844 {
            chain_id: 1337,
            max_priority_fee_per_gas: 2,
            max_fee_per_gas: 10,
            gas_limit: 100_000,
            to: Address::repeat_byte(0x21),
            blob_versioned_hashes: vec![B256::repeat_byte(1), B256::repeat_byte(2)],
            max_fee_per_data_gas: 1,
            sidecar: Some(sidecar),
            ..Default::default()
        }),
        Signature::default(),
    );

    let raw = vec![transaction.envelope_encoded()];
    let withdrawals = Withdrawals::default();
    let header = Header {
        transactions_root: proofs::calculate_transaction_root(&raw),
        withdrawals_root: Some(proofs::calculate_withdrawals_root(&withdrawals)),
        base_fee_per_gas: Some(7),
        gas_used: 100,
        data_gas_used: Some(0x20000),
        excess_data_gas: Some(0),
        ..Default::default()
    };
    let block = Block { header, body: vec![transaction], withdrawals: Some(withdrawals) };
    BlockWithReceipts {
        block: block.seal_slow(),
        receipts: vec![Receipt { success: true, gas_used: 100, cumulative_gas_used: 100 }],
    }
}

#[tokio::test]
async fn get_payload_reports_block_value_and_blobs() {
    let mut env = TestEnv::with_built_block(pos_spec(), true, built_block_with_blobs());
    let head = install_head(&env.store, 1_700_000_000);
    env.spawn_importer(PayloadStatusEnum::Valid);

    let response = env
        .server
        .fork_choice_updated_v2(forkchoice(head.hash()), Some(build_attributes(1_700_000_012)))
        .await
        .unwrap();
    let payload_id = response.payload_id.unwrap();

    let response = env.server.get_payload_v3(payload_id).await.unwrap();
    // effective tip is min(2, 10 - 7) = 2 per gas unit over 100 gas
    assert_eq!(response.block_value, U256::from(200));
    let bundle = response.blobs_bundle.unwrap();
    assert_eq!(bundle.blobs.len(), 2);
    assert_eq!(bundle.commitments.len(), 2);
    assert_eq!(bundle.proofs.len(), 2);
    assert_eq!(response.execution_payload.transactions.len(), 1);

    // V2 drops the bundle, everything else is identical
    let v2 = env.server.get_payload_v2(payload_id).await.unwrap();
    assert!(v2.blobs_bundle.is_none());
    assert_eq!(v2.block_value, U256::from(200));

    // repeated retrieval returns the same block
    let again = env.server.get_payload_v3(payload_id).await.unwrap();
    assert_eq!(again.execution_payload, response.execution_payload);
    assert_eq!(env.builds.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn inconsistent_blob_sidecar_fails_get_payload() {
    let mut built = built_block_with_blobs();
    // drop one proof
    if let Transaction::Eip4844(tx) = &mut built.block.body[0].transaction {
        tx.sidecar.as_mut().unwrap().proofs.pop();
    }

    let mut env = TestEnv::with_built_block(pos_spec(), true, built);
    let head = install_head(&env.store, 1_700_000_000);
    env.spawn_importer(PayloadStatusEnum::Valid);

    let response = env
        .server
        .fork_choice_updated_v2(forkchoice(head.hash()), Some(build_attributes(1_700_000_012)))
        .await
        .unwrap();
    let error = env.server.get_payload_v3(response.payload_id.unwrap()).await.unwrap_err();
    assert!(error.message().contains("inconsistent"));
}

#[tokio::test]
async fn not_a_pos_chain_is_an_error() {
    let env = TestEnv::new(Arc::new(ChainSpec::default()), false);
    let mut rng = generators::rng();

    let payload: ExecutionPayload =
        block_to_payload(&generators::random_block(&mut rng, 1, None, 0));
    let error = env.server.new_payload_v1(payload).await.unwrap_err();
    assert_eq!(error.message(), "not a proof-of-stake chain");
}

#[tokio::test]
async fn importer_verdict_is_relayed() {
    let mut env = TestEnv::new(pos_spec(), false);
    let head = install_head(&env.store, 1_700_000_000);
    let requests = env.spawn_importer(PayloadStatusEnum::Valid);

    // the head is the current head, so the fast path defers to the importer
    let response =
        env.server.fork_choice_updated_v2(forkchoice(head.hash()), None).await.unwrap();
    assert!(response.payload_status.is_valid());
    assert_eq!(response.payload_status.latest_valid_hash, Some(head.hash()));
    assert_eq!(requests.load(Ordering::SeqCst), 1);
}
