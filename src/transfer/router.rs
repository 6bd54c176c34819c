//! Transfer Routing
//!
//! Pure selection of the transfer strategy from the payer and payee bank
//! codes. Routing on a blank payee bank code is undefined, so it is rejected
//! here (and again at the request boundary before the engine runs).

use thiserror::Error;
use tracing::debug;

use super::types::TransferType;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("payee bank code is required")]
    MissingPayeeBankCode,
}

/// Select the transfer type: equal codes (case-sensitive, exact) are
/// intra-bank, any other non-empty code is inter-bank.
pub fn select(payer_bank_code: &str, payee_bank_code: &str) -> Result<TransferType, RouteError> {
    if payee_bank_code.trim().is_empty() {
        return Err(RouteError::MissingPayeeBankCode);
    }

    let transfer_type = if payer_bank_code == payee_bank_code {
        TransferType::IntraBank
    } else {
        TransferType::InterBank
    };
    debug!(
        payee_bank_code,
        transfer_type = %transfer_type,
        "identified transfer type"
    );
    Ok(transfer_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_codes_intra_bank() {
        assert_eq!(select("A00001", "A00001").unwrap(), TransferType::IntraBank);
    }

    #[test]
    fn test_different_codes_inter_bank() {
        assert_eq!(select("A00001", "B00001").unwrap(), TransferType::InterBank);
    }

    #[test]
    fn test_case_sensitive_exact_match() {
        // not an exact match, so it routes inter-bank
        assert_eq!(select("A00001", "a00001").unwrap(), TransferType::InterBank);
    }

    #[test]
    fn test_blank_payee_code_rejected() {
        assert_eq!(select("A00001", "").unwrap_err(), RouteError::MissingPayeeBankCode);
        assert_eq!(
            select("A00001", "   ").unwrap_err(),
            RouteError::MissingPayeeBankCode
        );
    }
}
