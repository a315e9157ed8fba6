use futures::future::join_all;
use matches::assert_matches;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use test_case::test_case;
use we_keystore::test_keystore::*;
use we_keystore::{AgentPubKeyExt, InProcKeystore, LocalBinding};
use we_rust_utils::*;
use we_zome_types::prelude::*;

fn agent(s: &str) -> AgentPubKey {
    s.parse().unwrap()
}

fn unsigned_js(provenance: &AgentPubKey, expires_at: i64) -> ZomeCallUnsignedJs {
    ZomeCallUnsignedJs {
        cell_id: vec![
            DnaHash::from_raw_32(vec![0x11; 32]).into_inner(),
            provenance.clone().into_inner(),
        ],
        zome_name: "posts".into(),
        fn_name: "create_post".into(),
        payload: vec![0x92, 0x01, 0x02],
        cap_secret: Some(vec![0x44; 64]),
        provenance: provenance.clone().into_inner(),
        nonce: vec![0x55; 32],
        expires_at,
    }
}

fn in_five_minutes() -> i64 {
    Timestamp::now()
        .saturating_add(&Duration::from_secs(300))
        .as_micros()
}

fn verifies(signed: &ZomeCallJs) -> bool {
    let call = ZomeCall::try_from(signed.clone()).unwrap();
    let data = call.data_to_sign().unwrap();
    call.provenance.verify_signature_raw(&call.signature, &data)
}

async fn connected() -> (WeRustHandler, LocalBinding) {
    let binding = test_keystore()
        .unwrap()
        .bind_local(format!("handler-{}", nanoid::nanoid!()))
        .unwrap();
    let passphrase = std::str::from_utf8(TEST_PASSPHRASE).unwrap();
    let handler = WeRustHandler::connect(&binding.url(), passphrase)
        .await
        .unwrap();
    (handler, binding)
}

#[tokio::test(flavor = "multi_thread")]
async fn signed_call_verifies_and_keeps_its_fields() {
    we_trace::test_run().ok();
    let (handler, _binding) = connected().await;
    let unsigned = unsigned_js(&agent(TEST_AGENT_PK_1), in_five_minutes());

    let signed = handler.sign_zome_call(unsigned.clone()).await.unwrap();
    assert!(verifies(&signed));
    assert_eq!(unsigned.cell_id, signed.cell_id);
    assert_eq!(unsigned.cap_secret, signed.cap_secret);
    assert_eq!(unsigned.nonce, signed.nonce);
    assert_eq!(unsigned.expires_at, signed.expires_at);
    assert_eq!(64, signed.signature.len());
}

#[test_case(|c| c.zome_name.push('x') ; "zome name")]
#[test_case(|c| c.fn_name.push('x') ; "fn name")]
#[test_case(|c| c.payload.push(0) ; "payload")]
#[test_case(|c| c.cap_secret = None ; "cap secret")]
#[test_case(|c| c.nonce[0] ^= 1 ; "nonce")]
#[test_case(|c| c.expires_at += 1 ; "expires at")]
#[test_case(|c| c.cell_id[0] = DnaHash::from_raw_32(vec![0x12; 32]).into_inner() ; "dna hash")]
#[test_case(|c| c.cell_id[1] = AgentPubKey::from_raw_32(vec![0x13; 32]).into_inner() ; "cell agent")]
#[test_case(|c| c.provenance = agent(TEST_AGENT_PK_2).into_inner() ; "provenance")]
#[tokio::test(flavor = "multi_thread")]
async fn tampering_with_any_field_breaks_the_signature(tamper: fn(&mut ZomeCallJs)) {
    let (handler, _binding) = connected().await;
    let mut signed = handler
        .sign_zome_call(unsigned_js(&agent(TEST_AGENT_PK_1), in_five_minutes()))
        .await
        .unwrap();
    tamper(&mut signed);
    assert!(!verifies(&signed));
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_provenance_is_rejected() {
    let (handler, _binding) = connected().await;
    let stranger = AgentPubKey::from_raw_32(vec![0x99; 32]);
    assert_matches!(
        handler
            .sign_zome_call(unsigned_js(&stranger, in_five_minutes()))
            .await,
        Err(ZomeCallSignerError::UnknownKey(k)) if k == stranger
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn expired_call_is_rejected() {
    let (handler, _binding) = connected().await;
    let an_hour_ago = Timestamp::now()
        .saturating_sub(&Duration::from_secs(3600))
        .as_micros();
    assert_matches!(
        handler
            .sign_zome_call(unsigned_js(&agent(TEST_AGENT_PK_1), an_hour_ago))
            .await,
        Err(ZomeCallSignerError::Expired { .. })
    );

    // zero means the call never expires
    let signed = handler
        .sign_zome_call(unsigned_js(&agent(TEST_AGENT_PK_1), 0))
        .await
        .unwrap();
    assert!(verifies(&signed));
}

#[tokio::test(flavor = "multi_thread")]
async fn malformed_record_is_rejected() {
    let (handler, _binding) = connected().await;
    let mut record = unsigned_js(&agent(TEST_AGENT_PK_1), in_five_minutes());
    record.nonce.truncate(16);
    assert_matches!(
        handler.sign_zome_call(record).await,
        Err(ZomeCallSignerError::InvalidZomeCall(_))
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn closed_handler_rejects_every_sign() {
    let (handler, _binding) = connected().await;
    handler.close().await.unwrap();
    assert_eq!(HandlerState::Closed, handler.state());
    for pk in [TEST_AGENT_PK_1, TEST_AGENT_PK_2] {
        assert_matches!(
            handler
                .sign_zome_call(unsigned_js(&agent(pk), in_five_minutes()))
                .await,
            Err(ZomeCallSignerError::NotConnected)
        );
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_signs_each_verify() {
    let (handler, _binding) = connected().await;
    let handler = Arc::new(handler);
    let agents = [
        TEST_AGENT_PK_1,
        TEST_AGENT_PK_2,
        TEST_AGENT_PK_3,
        TEST_AGENT_PK_4,
    ];
    let calls: Vec<ZomeCallUnsignedJs> = (0..40u8)
        .map(|i| {
            let mut call = unsigned_js(&agent(agents[i as usize % 4]), in_five_minutes());
            call.payload = vec![i];
            call
        })
        .collect();

    let results = join_all(calls.iter().cloned().map(|call| {
        let handler = handler.clone();
        tokio::spawn(async move { handler.sign_zome_call(call).await })
    }))
    .await;

    for (call, res) in calls.into_iter().zip(results) {
        let signed = res.unwrap().unwrap();
        assert_eq!(call.payload, signed.payload);
        assert_eq!(call.provenance, signed.provenance);
        assert!(verifies(&signed));
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn local_keystore_checks_the_passphrase() {
    let keystore = InProcKeystore::new(b"correct");
    let _binding = keystore.bind_local("keystore").unwrap();

    let signer = ZomeCallSigner::connect("local://keystore", "correct")
        .await
        .unwrap();
    assert_eq!(HandlerState::Connected, signer.state());
    signer.close().await.unwrap();

    assert_matches!(
        ZomeCallSigner::connect("local://keystore", "wrong").await,
        Err(ZomeCallSignerError::Authentication)
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn both_facades_sign_the_same_way() {
    let binding = test_keystore()
        .unwrap()
        .bind_local(format!("facades-{}", nanoid::nanoid!()))
        .unwrap();
    let passphrase = std::str::from_utf8(TEST_PASSPHRASE).unwrap();
    let we = WeRustHandler::connect(&binding.url(), passphrase)
        .await
        .unwrap();
    let signer = ZomeCallSigner::connect(&binding.url(), passphrase)
        .await
        .unwrap();

    let call = unsigned_js(&agent(TEST_AGENT_PK_3), in_five_minutes());
    let a = we.sign_zome_call(call.clone()).await.unwrap();
    let b = signer.sign_zome_call(call).await.unwrap();
    // ed25519 signatures are deterministic
    assert_eq!(a, b);

    let payload = b"raw payload".to_vec();
    let pub_key = agent(TEST_AGENT_PK_3);
    let signature = we
        .sign_payload(payload.clone(), pub_key.clone().into_inner())
        .await
        .unwrap();
    let signature = Signature::try_from(signature).unwrap();
    assert!(pub_key.verify_signature_raw(&signature, &payload));
}

#[tokio::test(flavor = "multi_thread")]
async fn handler_from_config_file() {
    let binding = test_keystore()
        .unwrap()
        .bind_local(format!("config-{}", nanoid::nanoid!()))
        .unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("signer.yaml");
    std::fs::write(
        &path,
        format!(
            "keystore_connection_url: {}\nkeystore:\n  sign_timeout_ms: 5000\nlog_output: None\n",
            binding.url()
        ),
    )
    .unwrap();

    let config = HandlerConfig::load(&path).unwrap();
    config.init_tracing().unwrap();
    let handler = Handler::connect_from_config(&config, TEST_PASSPHRASE)
        .await
        .unwrap();
    let signed = handler
        .sign_zome_call_js(unsigned_js(&agent(TEST_AGENT_PK_2), in_five_minutes()))
        .await
        .unwrap();
    assert!(verifies(&signed));
}
