/// 식별자 생성기
/// Identifier generators
///
/// 역할:
/// - 지갑 번호 생성 (13자리 hex, 이체 주소로 사용)
/// - 거래 reference 생성 (입금/이체 공통)
///
/// 고유성은 DB의 unique 제약이 최종 보장하고,
/// 충돌 시 호출자가 재생성한다 (확률상 사실상 발생하지 않음).

use rand::RngCore;

/// 지갑 번호 생성
/// Generate wallet number
///
/// 암호학적 난수 7바이트를 hex로 인코딩한 뒤 13자로 자른다.
pub fn generate_wallet_number() -> String {
    let mut bytes = [0u8; 7];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)[..13].to_string()
}

/// 거래 reference 생성
/// Generate transaction reference
///
/// 형식: TXN_<unix millis>_<random hex 16자리>
pub fn generate_transaction_reference() -> String {
    let mut bytes = [0u8; 8];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!(
        "TXN_{}_{}",
        chrono::Utc::now().timestamp_millis(),
        hex::encode(bytes)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wallet_number_format() {
        let number = generate_wallet_number();
        assert_eq!(number.len(), 13);
        assert!(number.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_wallet_numbers_differ() {
        // 난수 기반이므로 연속 생성 시 사실상 충돌 없음
        let a = generate_wallet_number();
        let b = generate_wallet_number();
        assert_ne!(a, b);
    }

    #[test]
    fn test_transaction_reference_format() {
        let reference = generate_transaction_reference();
        let parts: Vec<&str> = reference.splitn(3, '_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "TXN");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 16);
        assert!(parts[2].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_transaction_references_differ() {
        let a = generate_transaction_reference();
        let b = generate_transaction_reference();
        assert_ne!(a, b);
    }
}
