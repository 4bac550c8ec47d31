use super::paystack::{
    verify_webhook_signature, GatewayInitData, GatewayVerifyData, PaymentGateway,
};
use anyhow::{bail, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

/// Mock Payment Gateway (테스트용 구현)
/// Mock payment gateway (implementation for testing)
///
/// 실제 Paystack API를 호출하지 않고 더미 데이터를 반환합니다.
/// 서명 검증은 실서비스와 같은 HMAC-SHA512 로직을 사용하므로
/// 테스트에서 compute_webhook_signature로 만든 서명이 그대로 통과합니다.
pub struct MockPaymentGateway {
    secret_key: String,
    /// initialize 실패 모드 (게이트웨이 장애 시나리오 테스트용)
    fail_initialize: AtomicBool,
    /// 초기화된 거래 기록 (reference, amount)
    initialized: Mutex<Vec<(String, u64)>>,
}

impl MockPaymentGateway {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            fail_initialize: AtomicBool::new(false),
            initialized: Mutex::new(Vec::new()),
        }
    }

    /// initialize 호출이 실패하도록 설정
    pub fn set_fail_initialize(&self, fail: bool) {
        self.fail_initialize.store(fail, Ordering::SeqCst);
    }

    /// 초기화된 거래 목록 조회
    pub async fn initialized_transactions(&self) -> Vec<(String, u64)> {
        self.initialized.lock().await.clone()
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn initialize_transaction(
        &self,
        _email: &str,
        amount: u64,
        reference: &str,
    ) -> Result<GatewayInitData> {
        if self.fail_initialize.load(Ordering::SeqCst) {
            bail!("MockPaymentGateway: gateway unavailable");
        }

        self.initialized
            .lock()
            .await
            .push((reference.to_string(), amount));

        Ok(GatewayInitData {
            authorization_url: format!("https://checkout.paystack.test/{}", reference),
            access_code: format!("ACCESS_{}", reference),
            reference: reference.to_string(),
        })
    }

    async fn verify_transaction(&self, reference: &str) -> Result<GatewayVerifyData> {
        let initialized = self.initialized.lock().await;
        match initialized.iter().find(|(r, _)| r == reference) {
            Some((_, amount)) => Ok(GatewayVerifyData {
                status: "success".to_string(),
                amount: *amount,
                reference: reference.to_string(),
            }),
            None => bail!("MockPaymentGateway: unknown reference {}", reference),
        }
    }

    fn verify_webhook_signature(&self, payload: &[u8], signature: &str) -> bool {
        verify_webhook_signature(&self.secret_key, payload, signature)
    }
}
