use serde::Serialize;

/// Attribution models supported by the reporting engine.
///
/// Wire codes are fixed by the API; see [`code`](Self::code).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributionModel {
    LastClick,
    FirstClick,
    Linear,
    ByPosition,
    FirstCommunication,
    LinearByCommunication,
    LinearWithPostview,
    LastClickWithPostview,
    FirstClickWithPostview,
    NotFirstNotLastClick,
    LastCommunication,
    ByPositionWithPostview,
}

impl AttributionModel {
    /// Numeric model code used on the wire.
    pub const fn code(self) -> u16 {
        match self {
            AttributionModel::LastClick => 1,
            AttributionModel::FirstClick => 2,
            AttributionModel::Linear => 3,
            AttributionModel::ByPosition => 4,
            AttributionModel::FirstCommunication => 5,
            AttributionModel::LinearByCommunication => 6,
            AttributionModel::LinearWithPostview => 10,
            AttributionModel::LastClickWithPostview => 15,
            AttributionModel::FirstClickWithPostview => 16,
            AttributionModel::NotFirstNotLastClick => 17,
            AttributionModel::LastCommunication => 22,
            AttributionModel::ByPositionWithPostview => 23,
        }
    }
}

/// Conversion attribution settings for a report query.
///
/// Serializes as `{"model_id": N, "period": N, "with_direct": B}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribution {
    model_id: u16,
    period: u32,
    with_direct: bool,
}

impl Attribution {
    /// `period` is the lookback window in days.
    pub fn new(model: AttributionModel, period: u32, with_direct: bool) -> Self {
        Self {
            model_id: model.code(),
            period,
            with_direct,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_codes() {
        assert_eq!(AttributionModel::LastClick.code(), 1);
        assert_eq!(AttributionModel::FirstClick.code(), 2);
        assert_eq!(AttributionModel::Linear.code(), 3);
        assert_eq!(AttributionModel::ByPosition.code(), 4);
        assert_eq!(AttributionModel::FirstCommunication.code(), 5);
        assert_eq!(AttributionModel::LinearByCommunication.code(), 6);
        assert_eq!(AttributionModel::LinearWithPostview.code(), 10);
        assert_eq!(AttributionModel::LastClickWithPostview.code(), 15);
        assert_eq!(AttributionModel::FirstClickWithPostview.code(), 16);
        assert_eq!(AttributionModel::NotFirstNotLastClick.code(), 17);
        assert_eq!(AttributionModel::LastCommunication.code(), 22);
        assert_eq!(AttributionModel::ByPositionWithPostview.code(), 23);
    }

    #[test]
    fn test_attribution_serialization() {
        let attribution = Attribution::new(AttributionModel::LinearWithPostview, 1, true);
        assert_eq!(
            serde_json::to_string(&attribution).unwrap(),
            r#"{"model_id":10,"period":1,"with_direct":true}"#
        );
    }
}
