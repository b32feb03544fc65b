//! Well-known model identifiers, grouped by vendor.
//!
//! Every vendor except Anthropic is reached through the OpenAI-compatible
//! dialect.

pub mod openai {
    pub const GPT_4O: &str = "gpt-4o";
    pub const GPT_4O_MINI: &str = "gpt-4o-mini";
    pub const GPT_4_1: &str = "gpt-4.1";
    pub const GPT_4_1_MINI: &str = "gpt-4.1-mini";
    pub const GPT_4_1_NANO: &str = "gpt-4.1-nano";
    pub const O1: &str = "o1";
    pub const O1_MINI: &str = "o1-mini";
    pub const O3: &str = "o3";
    pub const O3_MINI: &str = "o3-mini";
    pub const O4_MINI: &str = "o4-mini";

    /// Every model in this family.
    pub const ALL: &[&str] = &[
        GPT_4O,
        GPT_4O_MINI,
        GPT_4_1,
        GPT_4_1_MINI,
        GPT_4_1_NANO,
        O1,
        O1_MINI,
        O3,
        O3_MINI,
        O4_MINI,
    ];
}

pub mod deepseek {
    pub const CHAT: &str = "deepseek-chat";
    pub const REASONER: &str = "deepseek-reasoner";

    /// Every model in this family.
    pub const ALL: &[&str] = &[CHAT, REASONER];
}

pub mod gemini {
    pub const GEMINI_2_0_FLASH: &str = "gemini-2.0-flash";
    pub const GEMINI_2_0_FLASH_EXP: &str = "gemini-2.0-flash-exp";
    pub const GEMINI_2_5_PRO: &str = "gemini-2.5-pro";
    pub const GEMINI_2_5_FLASH: &str = "gemini-2.5-flash";

    /// Every model in this family.
    pub const ALL: &[&str] = &[
        GEMINI_2_0_FLASH,
        GEMINI_2_0_FLASH_EXP,
        GEMINI_2_5_PRO,
        GEMINI_2_5_FLASH,
    ];
}

pub mod anthropic {
    pub const CLAUDE_OPUS_4: &str = "claude-opus-4";
    pub const CLAUDE_SONNET_4: &str = "claude-sonnet-4";
    pub const CLAUDE_3_7_SONNET: &str = "claude-3-7-sonnet";
    pub const CLAUDE_3_5_HAIKU: &str = "claude-3-5-haiku";

    /// Every model in this family.
    pub const ALL: &[&str] = &[CLAUDE_OPUS_4, CLAUDE_SONNET_4, CLAUDE_3_7_SONNET, CLAUDE_3_5_HAIKU];
}

pub mod minimax {
    pub const M2_5: &str = "MiniMax-M2.5";
    pub const M2_5_HIGHSPEED: &str = "MiniMax-M2.5-highspeed";
    pub const M2_1: &str = "MiniMax-M2.1";
    pub const M2_1_HIGHSPEED: &str = "MiniMax-M2.1-highspeed";
    pub const M2: &str = "MiniMax-M2";

    /// Every model in this family.
    pub const ALL: &[&str] = &[M2_5, M2_5_HIGHSPEED, M2_1, M2_1_HIGHSPEED, M2];
}

/// Moonshot's Kimi family.
pub mod kimi {
    pub const K2: &str = "kimi-k2";
    pub const K2_5: &str = "kimi-k2.5";
    pub const MOONSHOT_V1_8K: &str = "moonshot-v1-8k";
    pub const MOONSHOT_V1_32K: &str = "moonshot-v1-32k";
    pub const MOONSHOT_V1_128K: &str = "moonshot-v1-128k";

    /// Every model in this family.
    pub const ALL: &[&str] = &[K2, K2_5, MOONSHOT_V1_8K, MOONSHOT_V1_32K, MOONSHOT_V1_128K];
}

/// Zhipu GLM.
pub mod glm {
    pub const GLM_4_PLUS: &str = "glm-4-plus";
    pub const GLM_4_AIR: &str = "glm-4-air";
    pub const GLM_4_AIRX: &str = "glm-4-airx";
    pub const GLM_4_LONG: &str = "glm-4-long";
    pub const GLM_4_FLASH: &str = "glm-4-flash";

    /// Every model in this family.
    pub const ALL: &[&str] = &[GLM_4_PLUS, GLM_4_AIR, GLM_4_AIRX, GLM_4_LONG, GLM_4_FLASH];
}

/// ByteDance Doubao.
pub mod doubao {
    pub const PRO_32K: &str = "doubao-pro-32k";
    pub const PRO_1_5_256K: &str = "doubao-1.5-pro-256k";
    pub const LITE_32K: &str = "doubao-lite-32k";
    pub const LITE_128K: &str = "doubao-lite-128k";

    /// Every model in this family.
    pub const ALL: &[&str] = &[PRO_32K, PRO_1_5_256K, LITE_32K, LITE_128K];
}

/// Alibaba Qwen.
pub mod qwen {
    pub const MAX: &str = "qwen-max";
    pub const PLUS: &str = "qwen-plus";
    pub const TURBO: &str = "qwen-turbo";
    pub const QWEN3_MAX: &str = "qwen3-max";
    pub const QWEN3_5_PLUS: &str = "qwen3.5-plus";
    pub const QWEN3_5_FLASH: &str = "qwen3.5-flash";

    /// Every model in this family.
    pub const ALL: &[&str] = &[MAX, PLUS, TURBO, QWEN3_MAX, QWEN3_5_PLUS, QWEN3_5_FLASH];
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_model_names_are_unique_and_non_empty() {
        let families = [
            openai::ALL,
            deepseek::ALL,
            gemini::ALL,
            anthropic::ALL,
            minimax::ALL,
            kimi::ALL,
            glm::ALL,
            doubao::ALL,
            qwen::ALL,
        ];
        let all: Vec<&str> = families
            .iter()
            .flat_map(|family| family.iter().copied())
            .collect();
        assert_eq!(all.len(), 45);
        assert!(all.iter().all(|name| !name.is_empty()));
        let unique: HashSet<&str> = all.iter().copied().collect();
        assert_eq!(unique.len(), all.len());
    }

    #[test]
    fn test_anthropic_family() {
        assert!(anthropic::ALL.iter().all(|name| name.starts_with("claude-")));
    }
}
