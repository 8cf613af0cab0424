use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List {
    pub id: String,
    pub title: String,
    pub board_id: String,
    pub position: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub list_id: String,
    pub position: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for the `boards` table. The server fills in id and timestamps.
#[derive(Debug, Clone, Serialize)]
pub struct NewBoard {
    pub title: String,
    pub description: Option<String>,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewList {
    pub title: String,
    pub board_id: String,
    pub position: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewCard {
    pub title: String,
    pub list_id: String,
    pub position: i64,
}

/// A `lists` row with its embedded `cards(*)` relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListWithCards {
    #[serde(flatten)]
    pub list: List,
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl ListWithCards {
    pub fn empty(list: List) -> Self {
        Self {
            list,
            cards: Vec::new(),
        }
    }

    pub fn sort_cards(&mut self) {
        self.cards.sort_by_key(|card| card.position);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardWithLists {
    #[serde(flatten)]
    pub board: Board,
    pub lists: Vec<ListWithCards>,
}

impl BoardWithLists {
    pub fn find_list(&self, list_id: &str) -> Option<&ListWithCards> {
        self.lists.iter().find(|l| l.list.id == list_id)
    }

    pub fn find_list_mut(&mut self, list_id: &str) -> Option<&mut ListWithCards> {
        self.lists.iter_mut().find(|l| l.list.id == list_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_with_embedded_cards_deserializes() {
        let raw = json!({
            "id": "l1",
            "title": "Todo",
            "board_id": "b1",
            "position": 0,
            "created_at": "2024-05-01T10:00:00.123456+00:00",
            "updated_at": "2024-05-01T10:00:00.123456+00:00",
            "cards": [{
                "id": "c1",
                "title": "Write spec",
                "description": null,
                "list_id": "l1",
                "position": 0,
                "created_at": "2024-05-01T10:01:00+00:00",
                "updated_at": "2024-05-01T10:01:00+00:00"
            }]
        });

        let list: ListWithCards = serde_json::from_value(raw).unwrap();
        assert_eq!(list.list.title, "Todo");
        assert_eq!(list.cards.len(), 1);
        assert_eq!(list.cards[0].description, None);
    }

    #[test]
    fn test_new_board_omits_unset_color() {
        let payload = NewBoard {
            title: "Sprint 1".into(),
            description: None,
            user_id: "u1".into(),
            color: None,
        };

        let value = serde_json::to_value(&payload).unwrap();
        assert!(value.get("color").is_none());
        assert!(value["description"].is_null());
    }

    #[test]
    fn test_sort_cards_by_position() {
        let now = Utc::now();
        let card = |id: &str, position: i64| Card {
            id: id.into(),
            title: id.into(),
            description: None,
            list_id: "l1".into(),
            position,
            created_at: now,
            updated_at: now,
        };
        let mut list = ListWithCards {
            list: List {
                id: "l1".into(),
                title: "Todo".into(),
                board_id: "b1".into(),
                position: 0,
                created_at: now,
                updated_at: now,
            },
            cards: vec![card("c", 2), card("a", 0), card("b", 1)],
        };

        list.sort_cards();
        let ids: Vec<&str> = list.cards.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
