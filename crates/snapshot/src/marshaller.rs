use crate::error::Result;
use settings_index::Contribution;

/// Encodes a single contribution to bytes and back.
pub trait ContributionMarshaller {
    fn marshal(&self, contribution: &Contribution) -> Result<Vec<u8>>;

    fn unmarshal(&self, bytes: &[u8]) -> Result<Contribution>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonMarshaller {
    pub pretty: bool,
}

impl ContributionMarshaller for JsonMarshaller {
    fn marshal(&self, contribution: &Contribution) -> Result<Vec<u8>> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(contribution)?
        } else {
            serde_json::to_vec(contribution)?
        };
        Ok(bytes)
    }

    fn unmarshal(&self, bytes: &[u8]) -> Result<Contribution> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
