use crate::domain::ChatMessage;

const SYSTEM_TEMPLATE: &str = "You are a professional assistant who writes meeting minutes from \
recorded conversations. Capture the agenda items, the opinions raised, concrete proposals and \
figures, decisions, and open action items accurately. Avoid summaries so short that details are \
lost. Write in {language}. If the input is already structured as minutes with the sections below, \
return it unchanged.";

const USER_TEMPLATE: &str = "Summarize the following text in {language}.\n\n\
If it is already formatted as minutes, output it as is. Otherwise:\n\
1. Record the key points, discussion and conclusion of each agenda item.\n\
2. Keep any concrete numbers or proposals.\n\
3. Stay readable while keeping enough detail.\n\n\
Text:\n{text}\n\n\
Output format:\n\
[Overview]\n<overall summary of the meeting>\n\n\
[Agenda]\nDiscussion: <details of the discussion>\nDecision: <outcome of the item>\n\n\
[Open items]\n<action items and unresolved questions>\n\n\
[Conclusion]\n<overall conclusion>";

pub fn build_summary_prompt(text: &str, language: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_TEMPLATE.replace("{language}", language)),
        ChatMessage::user(
            USER_TEMPLATE
                .replace("{language}", language)
                .replace("{text}", text),
        ),
    ]
}
