use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct NewItem {
    pub product_info_id: i64,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddItemsRequest {
    pub items: Vec<NewItem>,
}

/// Why a single line of an add request was not created.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ItemFailure {
    pub index: usize,
    pub product_info_id: i64,
    pub reason: String,
}

/// Batch adds are not atomic: `created` lines stay even when others fail.
#[derive(Debug, Default, Serialize, ToSchema)]
pub struct AddItemsResult {
    pub created: usize,
    pub failures: Vec<ItemFailure>,
}

/// Item ids as either a comma separated string (`"3,4,x"`) or a JSON array.
/// Entries that are not positive integers are dropped.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum ItemIds {
    Csv(String),
    List(Vec<Value>),
}

impl ItemIds {
    pub fn ids(&self) -> Vec<i64> {
        match self {
            ItemIds::Csv(raw) => raw.split(',').filter_map(parse_digits).collect(),
            ItemIds::List(values) => values
                .iter()
                .filter_map(|v| match v {
                    Value::Number(n) => n.as_i64().filter(|id| *id > 0),
                    Value::String(s) => parse_digits(s),
                    _ => None,
                })
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ItemIds::Csv(raw) => raw.trim().is_empty(),
            ItemIds::List(values) => values.is_empty(),
        }
    }
}

fn parse_digits(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<i64>().ok().filter(|id| *id > 0)
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RemoveItemsRequest {
    pub items: ItemIds,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RemoveItemsResult {
    pub deleted: u64,
}

/// One entry of a quantity update. Anything that is not an integer
/// `id`/`quantity` pair lands in `Malformed` and is skipped.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum QuantityUpdate {
    Valid { id: i64, quantity: i64 },
    Malformed(Value),
}

impl QuantityUpdate {
    /// `(item id, quantity)` when the entry can be applied.
    pub fn applicable(&self) -> Option<(i64, i32)> {
        match self {
            QuantityUpdate::Valid { id, quantity } if *id > 0 && *quantity > 0 => {
                i32::try_from(*quantity).ok().map(|q| (*id, q))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateItemsRequest {
    pub items: Vec<QuantityUpdate>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UpdateItemsResult {
    pub updated: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_ids_skip_non_numeric_entries() {
        let ids: RemoveItemsRequest = serde_json::from_str(r#"{"items":"3, 4,x,-1,,5a"}"#).unwrap();
        assert_eq!(ids.items.ids(), vec![3, 4]);
    }

    #[test]
    fn list_ids_accept_numbers_and_digit_strings() {
        let ids: RemoveItemsRequest =
            serde_json::from_str(r#"{"items":[7,"8",1.5,null,"nine",-2]}"#).unwrap();
        assert_eq!(ids.items.ids(), vec![7, 8]);
    }

    #[test]
    fn empty_id_payloads_are_detected() {
        assert!(ItemIds::Csv("  ".into()).is_empty());
        assert!(ItemIds::List(Vec::new()).is_empty());
        assert!(!ItemIds::Csv("1".into()).is_empty());
    }

    #[test]
    fn quantity_updates_keep_only_integer_pairs() {
        let req: UpdateItemsRequest = serde_json::from_str(
            r#"{"items":[
                {"id":1,"quantity":3},
                {"id":"2","quantity":3},
                {"id":3,"quantity":2.5},
                {"id":4},
                {"id":5,"quantity":0},
                "junk"
            ]}"#,
        )
        .unwrap();
        let applied: Vec<_> = req.items.iter().filter_map(QuantityUpdate::applicable).collect();
        assert_eq!(applied, vec![(1, 3)]);
    }

    #[test]
    fn add_request_requires_typed_items() {
        let bad = serde_json::from_str::<AddItemsRequest>(r#"{"items":[{"product_info_id":"x","quantity":1}]}"#);
        assert!(bad.is_err());
    }
}
