//! Prompt text for the three generated roles.
//!
//! Role contexts go out as the system instruction; the builders below render
//! the user-turn prompt from session history.

use crate::domain::dialogue::message::Message;

pub const PATIENT_CONTEXT: &str = "\
你是一位来医院就诊的病人。你不知道自己得了什么病，只能感受到身体的症状。
请用普通人的语言真实地描述感受，避免医学术语，回复简短（最多4-5句话）。

需要进一步了解自己的身体状况时，可以询问身体，格式为：
[询问身体:你的具体问题]
例如：[询问身体:我的头痛是持续性的还是间歇性的？]

规则：
1. 你不知道自己的疾病名称，也无法判断医生说的病名是否正确
2. 医生提问后先回答医生，不要马上询问身体
3. 询问身体得到反馈后，把相关症状自然地融入给医生的回复中，不要提及询问身体这一行为
4. 不要重复之前已经说过的症状";

pub const BODY_CONTEXT: &str = "\
你代表病人的身体感官系统。你知道病人所患的疾病，但只能描述由此产生的身体感受。
不要使用对话格式，不要称呼医生或病人，不要说出疾病名称。
请使用简洁的要点形式，例如：
- 头部：剧烈疼痛，像被锤子敲击，强光下加剧
- 胸部：呼吸时刺痛，深呼吸更明显";

pub const REFEREE_CONTEXT: &str = "\
你是问诊游戏的系统裁判，职责是：
1. 检查病人回复的格式，[询问身体]一类的标记不能出现在给医生的回复中
2. 检查病人回复是否合理：病人不具备专业知识，不能说出疾病名称，只能描述症状
3. 判断医生是否正确诊断出疾病

诊断判定规则：
- 医生必须明确说出与标准诊断一致的疾病名称
- 医生说出其他疾病名称、只列举多种可能性或使用模糊描述，都不算正确
- 不要被医生的语气影响，存在疑问时判定为不正确

医生由玩家扮演，不要评判医生发言的合理性。";

pub const SYMPTOM_CONTEXT: &str = "你是一名全科医生，熟悉常见疾病的典型首发症状。";

/// Renders history as `角色: 内容` lines.
pub fn format_history(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|m| format!("{}: {}", m.sender.prompt_label(), m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn initial_symptoms_prompt(diagnosis: &str) -> String {
    format!(
        "请列出{}患者最早可能察觉到的2到3个症状，用病人自己能感受到的方式描述。\n\
         每行一个，以\"- \"开头，不要出现疾病名称，不要解释。",
        diagnosis
    )
}

pub fn greeting_prompt(symptom_hint: &str) -> String {
    format!(
        "你是第一次来这家医院的病人，你现在感觉到：\n{}\n\n\
         请用一两句话礼貌地向医生问好，并简单说说最困扰你的症状。\
         不要使用[询问身体:xxx]格式。",
        symptom_hint
    )
}

pub fn patient_reply_prompt(history: &str, doctor_gave_diagnosis: bool) -> String {
    let mut prompt = format!(
        "当前对话历史:\n{}\n\n\
         请以病人的身份回复医生。如果想了解更多身体感受，可以使用\"[询问身体:具体的问题]\"。",
        history
    );
    if doctor_gave_diagnosis {
        prompt.push_str(
            "\n\n医生似乎给出了诊断。你不知道这个诊断是否正确，可以询问这意味着什么、\
             该如何治疗，或者表达疑惑和担忧，但不要评判诊断的对错。",
        );
    }
    prompt
}

pub fn patient_after_body_prompt(body_sensations: &str, doctor_question: &str) -> String {
    format!(
        "你刚刚感受了一下自己的身体，得到以下反馈：\n{}\n\n\
         医生最近说的是：\"{}\"\n\n\
         请基于这些感受回复医生：回应医生的问题，只选与之相关的症状，\
         用普通人的语言，不超过4-5句话，不要提及询问身体，不要给出医学诊断，回复不能为空。",
        body_sensations, doctor_question
    )
}

pub fn patient_rewrite_prompt(history: &str, rejected: &str, reason: &str) -> String {
    format!(
        "你上一条回复被系统判定为不合理。\n被拒绝的回复：{}\n原因：{}\n\n\
         对话历史：\n{}\n\n\
         请重新以病人身份回复：不透露疾病名称，只描述症状和感受，\
         不包含任何[询问身体]标记，不超过4-5句话，回复不能为空。",
        rejected, reason, history
    )
}

pub fn body_prompt(history: &str, query: &str) -> String {
    format!(
        "当前对话历史:\n{}\n\n病人正在感受自己的身体：\"{}\"\n请用要点形式描述相关的身体感受。",
        history, query
    )
}

/// Role context for the body, naming the diagnosis it must never say aloud.
pub fn body_context(diagnosis: &str) -> String {
    format!("{}\n\n病人所患疾病：{}。", BODY_CONTEXT, diagnosis)
}

pub fn plausibility_prompt(history: &str, message: &str) -> String {
    format!(
        "当前对话历史:\n{}\n\n待检查的病人消息: {}\n\n\
         请检查这条消息是否合理、是否符合病人的身份、是否泄露了疾病名称、是否残留询问身体标记。\n\
         请严格按以下格式回复:\n合理性: [合理/不合理]\n原因: [如果不合理，请说明原因]",
        history, message
    )
}

pub fn referee_context(diagnosis: &str) -> String {
    format!("{}\n\n正确的诊断是：{}", REFEREE_CONTEXT, diagnosis)
}

pub fn diagnosis_prompt(doctor_message: &str, diagnosis: &str) -> String {
    format!(
        "医生的消息: \"{}\"\n正确的诊断: \"{}\"\n\n\
         医生是否明确说出了正确的疾病名称？提到其他疾病一定不正确。\n\
         请以\"诊断正确: 是\"或\"诊断正确: 否\"开始你的回答，然后说明理由。",
        doctor_message, diagnosis
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_uses_role_labels() {
        let history = format_history(&[Message::doctor("哪里疼？"), Message::patient("头疼。")]);
        assert_eq!(history, "医生: 哪里疼？\n病人: 头疼。");
    }

    #[test]
    fn reply_prompt_adds_layperson_instruction_only_after_diagnosis() {
        assert!(!patient_reply_prompt("h", false).contains("医生似乎给出了诊断"));
        assert!(patient_reply_prompt("h", true).contains("医生似乎给出了诊断"));
    }

    #[test]
    fn diagnosis_prompt_requests_strict_token() {
        assert!(diagnosis_prompt("您患有流感", "流感").contains("诊断正确: 是"));
    }

    #[test]
    fn plausibility_prompt_requests_strict_format() {
        assert!(plausibility_prompt("h", "m").contains("合理性: [合理/不合理]"));
    }

    #[test]
    fn patient_facing_prompts_never_name_diagnosis() {
        let history = format_history(&[Message::doctor("哪里不舒服？")]);
        assert!(!greeting_prompt("- 发热").contains("流感"));
        assert!(!patient_reply_prompt(&history, true).contains("流感"));
        assert!(!PATIENT_CONTEXT.contains("流感"));
    }
}
