use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateMaterialRequest {
    pub plan_id: Option<Uuid>,
    pub session_id: Option<Uuid>,
    #[validate(length(min = 1, max = 50))]
    pub material_type: String,
    /// Object-storage key for uploaded files.
    #[serde(default)]
    pub file_path: Option<String>,
    /// External link for URL materials.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub order_index: i32,
}

/// Optional list narrowing by parent plan or session.
#[derive(Debug, Deserialize, Default)]
pub struct MaterialFilter {
    pub plan_id: Option<Uuid>,
    pub session_id: Option<Uuid>,
}

impl MaterialFilter {
    /// Stable cache-key fragment for this filter, `None` when unfiltered.
    pub fn cache_fragment(&self) -> Option<String> {
        match (self.plan_id, self.session_id) {
            (None, None) => None,
            (plan, session) => Some(format!(
                "plan:{}/session:{}",
                plan.map(|id| id.to_string()).unwrap_or_default(),
                session.map(|id| id.to_string()).unwrap_or_default(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_fragment() {
        assert_eq!(MaterialFilter::default().cache_fragment(), None);

        let plan = Uuid::new_v4();
        let filter = MaterialFilter {
            plan_id: Some(plan),
            session_id: None,
        };
        assert_eq!(
            filter.cache_fragment(),
            Some(format!("plan:{plan}/session:"))
        );
    }
}
