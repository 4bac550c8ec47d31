use anyhow::{Context, Result};
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha512;
use std::time::Duration;

// =====================================================
// 결제 게이트웨이 인터페이스
// Payment Gateway Interface
// =====================================================
// 입금 흐름이 의존하는 외부 결제 제공자와의 좁은 접점을 정의합니다.
//
// 설계:
// - Service 계층은 이 trait만 참조 (구체적 구현 몰라도 됨)
// - 구현체: PaystackClient (실서비스), MockPaymentGateway (테스트)
// =====================================================

/// 거래 초기화 결과
/// Result of initializing a gateway transaction
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayInitData {
    /// 사용자가 결제를 완료할 리다이렉트 URL
    pub authorization_url: String,
    /// 게이트웨이 access code
    pub access_code: String,
    /// 요청에 사용한 reference (게이트웨이가 그대로 돌려줌)
    pub reference: String,
}

/// 거래 검증 결과 (비동기 상태 확인용)
/// Result of verifying a gateway transaction
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayVerifyData {
    pub status: String,
    pub amount: u64,
    pub reference: String,
}

/// 결제 게이트웨이 인터페이스
/// Payment gateway interface
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// 거래 초기화
    /// Initialize a transaction with the gateway
    ///
    /// # Arguments
    /// * `email` - 결제자 이메일 (게이트웨이가 요구하는 payee 식별자)
    /// * `amount` - 금액 (kobo)
    /// * `reference` - 우리가 생성한 거래 reference
    async fn initialize_transaction(
        &self,
        email: &str,
        amount: u64,
        reference: &str,
    ) -> Result<GatewayInitData>;

    /// 거래 검증 (out-of-band 상태 확인)
    /// Verify a transaction out of band
    async fn verify_transaction(&self, reference: &str) -> Result<GatewayVerifyData>;

    /// 웹훅 서명 검증
    /// Verify webhook signature
    ///
    /// 반드시 수신한 원본 body 바이트에 대해 검증해야 한다.
    /// 재직렬화한 JSON은 바이트 단위로 동일하다는 보장이 없다.
    fn verify_webhook_signature(&self, payload: &[u8], signature: &str) -> bool;
}

// =====================================================
// 웹훅 payload 모델
// =====================================================

/// 웹훅 이벤트 봉투
/// Webhook event envelope
///
/// data는 이벤트 종류별로 형태가 다르므로 일단 raw JSON으로 받고,
/// charge.success일 때만 PaystackWebhookData로 파싱한다.
#[derive(Debug, Deserialize)]
pub struct PaystackWebhookEnvelope {
    pub event: String,
    pub data: serde_json::Value,
}

/// charge 이벤트 data
/// Charge event data
#[derive(Debug, Deserialize)]
pub struct PaystackWebhookData {
    pub reference: String,
    pub status: String,
    pub amount: u64,
    #[serde(default)]
    pub customer: Option<PaystackCustomer>,
}

#[derive(Debug, Deserialize)]
pub struct PaystackCustomer {
    pub email: String,
}

// =====================================================
// Paystack 클라이언트
// =====================================================

/// Paystack API 응답 봉투 (initialize / verify 공통)
#[derive(Debug, Deserialize)]
struct PaystackResponse<T> {
    #[allow(dead_code)]
    status: bool,
    #[allow(dead_code)]
    message: String,
    data: T,
}

// Paystack API 클라이언트
// Paystack API client for external calls
pub struct PaystackClient {
    http_client: reqwest::Client,
    base_url: String,
    secret_key: String,
}

impl PaystackClient {
    // 클라이언트 생성
    // Create new Paystack client instance
    pub fn new(secret_key: String) -> Result<Self> {
        // 게이트웨이 호출은 타임아웃 제한 필수 (무한 대기 방지)
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: "https://api.paystack.co".to_string(),
            secret_key,
        })
    }

    // 거래 초기화: Paystack API 호출
    // Initialize transaction: call Paystack API
    pub async fn initialize_transaction(
        &self,
        email: &str,
        amount: u64,
        reference: &str,
    ) -> Result<GatewayInitData> {
        let url = format!("{}/transaction/initialize", self.base_url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .json(&serde_json::json!({
                "email": email,
                "amount": amount,
                "reference": reference,
            }))
            .send()
            .await
            .context("Failed to send request to Paystack API")?;

        // HTTP 상태 코드 확인
        // Check HTTP status code
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Paystack API returned error: {} - {}", status, body);
        }

        // JSON 파싱
        // Parse JSON response
        let body: PaystackResponse<GatewayInitData> = response
            .json()
            .await
            .context("Failed to parse Paystack initialize response")?;

        tracing::info!("Paystack transaction initialized: {}", reference);
        Ok(body.data)
    }

    // 거래 검증: Paystack API 호출
    // Verify transaction: call Paystack API
    pub async fn verify_transaction(&self, reference: &str) -> Result<GatewayVerifyData> {
        let url = format!("{}/transaction/verify/{}", self.base_url, reference);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .context("Failed to send request to Paystack API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Paystack API returned error: {} - {}", status, body);
        }

        let body: PaystackResponse<GatewayVerifyData> = response
            .json()
            .await
            .context("Failed to parse Paystack verify response")?;

        Ok(body.data)
    }
}

#[async_trait]
impl PaymentGateway for PaystackClient {
    async fn initialize_transaction(
        &self,
        email: &str,
        amount: u64,
        reference: &str,
    ) -> Result<GatewayInitData> {
        PaystackClient::initialize_transaction(self, email, amount, reference).await
    }

    async fn verify_transaction(&self, reference: &str) -> Result<GatewayVerifyData> {
        PaystackClient::verify_transaction(self, reference).await
    }

    fn verify_webhook_signature(&self, payload: &[u8], signature: &str) -> bool {
        verify_webhook_signature(&self.secret_key, payload, signature)
    }
}

// =====================================================
// 웹훅 서명 (HMAC-SHA512)
// =====================================================

type HmacSha512 = Hmac<Sha512>;

/// 웹훅 서명 계산 (hex 인코딩)
/// Compute webhook signature over the raw payload
///
/// Paystack은 공유 secret으로 요청 body 전체에 대한 HMAC-SHA512를 계산해
/// x-paystack-signature 헤더로 보낸다. 테스트에서 게이트웨이 쪽 서명을
/// 만들 때도 사용한다.
pub fn compute_webhook_signature(secret_key: &str, payload: &[u8]) -> String {
    let mut mac =
        HmacSha512::new_from_slice(secret_key.as_bytes()).expect("HMAC can take key of any size");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// 웹훅 서명 검증
/// Verify webhook signature in constant time
pub fn verify_webhook_signature(secret_key: &str, payload: &[u8], signature: &str) -> bool {
    let expected = compute_webhook_signature(secret_key, payload);
    let provided = match hex::decode(signature) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };
    let expected_bytes = match hex::decode(&expected) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };
    constant_time_eq::constant_time_eq(&expected_bytes, &provided)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "sk_test_secret";

    #[test]
    fn test_signature_round_trip() {
        let payload = br#"{"event":"charge.success","data":{"reference":"TXN_1"}}"#;
        let signature = compute_webhook_signature(TEST_SECRET, payload);
        assert!(verify_webhook_signature(TEST_SECRET, payload, &signature));
    }

    #[test]
    fn test_signature_rejects_tampered_payload() {
        let payload = br#"{"event":"charge.success","data":{"amount":5000}}"#;
        let signature = compute_webhook_signature(TEST_SECRET, payload);
        let tampered = br#"{"event":"charge.success","data":{"amount":9999}}"#;
        assert!(!verify_webhook_signature(TEST_SECRET, tampered, &signature));
    }

    #[test]
    fn test_signature_rejects_wrong_secret() {
        let payload = br#"{"event":"charge.success"}"#;
        let signature = compute_webhook_signature(TEST_SECRET, payload);
        assert!(!verify_webhook_signature("sk_live_other", payload, &signature));
    }

    #[test]
    fn test_signature_rejects_non_hex() {
        assert!(!verify_webhook_signature(TEST_SECRET, b"{}", "not-a-hex-string"));
    }

    #[test]
    fn test_webhook_envelope_parsing() {
        let payload = r#"{
            "event": "charge.success",
            "data": {
                "reference": "TXN_1700000000000_abcdef0123456789",
                "status": "success",
                "amount": 5000,
                "customer": { "email": "user@example.com" }
            }
        }"#;
        let envelope: PaystackWebhookEnvelope = serde_json::from_str(payload).unwrap();
        assert_eq!(envelope.event, "charge.success");

        let data: PaystackWebhookData = serde_json::from_value(envelope.data).unwrap();
        assert_eq!(data.reference, "TXN_1700000000000_abcdef0123456789");
        assert_eq!(data.status, "success");
        assert_eq!(data.amount, 5000);
        assert_eq!(data.customer.unwrap().email, "user@example.com");
    }

    #[test]
    fn test_webhook_envelope_tolerates_foreign_event_shape() {
        // charge.success가 아닌 이벤트는 data 형태가 달라도 봉투 파싱은 성공해야 함
        let payload = r#"{"event":"transfer.failed","data":{"whatever":[1,2,3]}}"#;
        let envelope: PaystackWebhookEnvelope = serde_json::from_str(payload).unwrap();
        assert_eq!(envelope.event, "transfer.failed");
    }
}
