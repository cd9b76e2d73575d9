use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    Human,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub content: String,
}

/// Alternating human/ai turns of the current session.
#[derive(Debug, Clone, Default)]
pub struct ConversationHistory {
    turns: Vec<ConversationTurn>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one answered question.
    pub fn record(&mut self, question: &str, answer: &str) {
        self.turns.push(ConversationTurn {
            role: TurnRole::Human,
            content: question.to_string(),
        });
        self.turns.push(ConversationTurn {
            role: TurnRole::Ai,
            content: answer.to_string(),
        });
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// `Human: …` / `Assistant: …` lines for the condense prompt.
    pub fn transcript(&self) -> String {
        self.turns
            .iter()
            .map(|turn| match turn.role {
                TurnRole::Human => format!("Human: {}", turn.content),
                TurnRole::Ai => format!("Assistant: {}", turn.content),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_pairs_in_order() {
        let mut history = ConversationHistory::new();
        history.record("What was BMW's revenue?", "€155.5bn");
        history.record("And Tesla's?", "$96.8bn");
        let roles: Vec<_> = history.turns().iter().map(|t| t.role).collect();
        assert_eq!(
            roles,
            vec![TurnRole::Human, TurnRole::Ai, TurnRole::Human, TurnRole::Ai]
        );
        assert_eq!(
            history.transcript(),
            "Human: What was BMW's revenue?\nAssistant: €155.5bn\nHuman: And Tesla's?\nAssistant: $96.8bn"
        );
    }

    #[test]
    fn roles_serialize_as_human_and_ai() {
        let turn = ConversationTurn {
            role: TurnRole::Ai,
            content: "x".into(),
        };
        let json = serde_json::to_string(&turn).unwrap();
        assert_eq!(json, r#"{"role":"ai","content":"x"}"#);
    }

    #[test]
    fn clear_empties() {
        let mut history = ConversationHistory::new();
        history.record("q", "a");
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.transcript(), "");
    }
}
