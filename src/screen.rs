//! # Screens and Callback Tokens
//!
//! A `Screen` is the logical view shown to the user. Nothing is stored between
//! updates: the only state is the `CallbackToken` embedded in each button,
//! which Telegram hands back verbatim when the button is pressed.

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

use crate::errors::BotError;

/// Telegram rejects callback payloads longer than this
pub const MAX_TOKEN_LEN: usize = 64;

/// What is currently presented to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Main menu; `returning` selects the "back to menu" text over the greeting
    MainMenu { returning: bool },
    TeachIntro,
    CaseList { page: usize },
    CaseDetail { case_id: u32 },
    QuizMenu,
    QuizQuestion { case_id: u32 },
    QuizResult { case_id: u32, chosen: usize },
    AwaitingCaseNumber,
}

impl Screen {
    /// Case the screen refers to, if any
    pub fn case_id(&self) -> Option<u32> {
        match *self {
            Screen::CaseDetail { case_id }
            | Screen::QuizQuestion { case_id }
            | Screen::QuizResult { case_id, .. } => Some(case_id),
            _ => None,
        }
    }
}

/// Payload attached to an inline keyboard button
///
/// Buttons are always emitted in the underscore spelling. The colon spellings
/// `cases_page:{n}`, `case_select:{id}`, `quiz_case:{id}` and
/// `answer:{id}:{idx}` are accepted as aliases on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackToken {
    MenuTeach,
    MenuCases,
    MenuQuiz,
    CasesPage(usize),
    Case(u32),
    QuizCase(u32),
    QuizRandom,
    QuizByNumber,
    Answer { case_id: u32, option: usize },
    BackMain,
}

lazy_static! {
    static ref NUMBERED_TOKEN: Regex =
        Regex::new(r"^(cases_page|case|quiz_case)_([0-9]{1,10})$").expect("Numbered token pattern should be valid");
    static ref ANSWER_TOKEN: Regex =
        Regex::new(r"^answer_([0-9]{1,10})_([0-9]{1,10})$").expect("Answer token pattern should be valid");
    static ref NUMBERED_ALIAS: Regex =
        Regex::new(r"^(cases_page|case_select|quiz_case):([0-9]{1,10})$")
            .expect("Numbered alias pattern should be valid");
    static ref ANSWER_ALIAS: Regex =
        Regex::new(r"^answer:([0-9]{1,10}):([0-9]{1,10})$").expect("Answer alias pattern should be valid");
}

impl FromStr for CallbackToken {
    type Err = BotError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let malformed = || BotError::MalformedToken(data.to_string());

        match data {
            "menu_teach" => return Ok(CallbackToken::MenuTeach),
            "menu_cases" => return Ok(CallbackToken::MenuCases),
            "menu_quiz" => return Ok(CallbackToken::MenuQuiz),
            "quiz_random" => return Ok(CallbackToken::QuizRandom),
            "quiz_by_number" => return Ok(CallbackToken::QuizByNumber),
            "back_main" => return Ok(CallbackToken::BackMain),
            _ => {}
        }

        if let Some(caps) = NUMBERED_TOKEN
            .captures(data)
            .or_else(|| NUMBERED_ALIAS.captures(data))
        {
            let number = &caps[2];
            return match &caps[1] {
                "cases_page" => number
                    .parse()
                    .map(CallbackToken::CasesPage)
                    .map_err(|_| malformed()),
                "case" | "case_select" => number.parse().map(CallbackToken::Case).map_err(|_| malformed()),
                "quiz_case" => number
                    .parse()
                    .map(CallbackToken::QuizCase)
                    .map_err(|_| malformed()),
                _ => Err(malformed()),
            };
        }

        if let Some(caps) = ANSWER_TOKEN.captures(data).or_else(|| ANSWER_ALIAS.captures(data)) {
            let case_id = caps[1].parse().map_err(|_| malformed())?;
            let option = caps[2].parse().map_err(|_| malformed())?;
            return Ok(CallbackToken::Answer { case_id, option });
        }

        Err(malformed())
    }
}

impl fmt::Display for CallbackToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackToken::MenuTeach => write!(f, "menu_teach"),
            CallbackToken::MenuCases => write!(f, "menu_cases"),
            CallbackToken::MenuQuiz => write!(f, "menu_quiz"),
            CallbackToken::CasesPage(page) => write!(f, "cases_page_{page}"),
            CallbackToken::Case(id) => write!(f, "case_{id}"),
            CallbackToken::QuizCase(id) => write!(f, "quiz_case_{id}"),
            CallbackToken::QuizRandom => write!(f, "quiz_random"),
            CallbackToken::QuizByNumber => write!(f, "quiz_by_number"),
            CallbackToken::Answer { case_id, option } => write!(f, "answer_{case_id}_{option}"),
            CallbackToken::BackMain => write!(f, "back_main"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fixed_tokens() {
        assert_eq!("menu_teach".parse::<CallbackToken>(), Ok(CallbackToken::MenuTeach));
        assert_eq!("back_main".parse::<CallbackToken>(), Ok(CallbackToken::BackMain));
        assert_eq!("quiz_by_number".parse::<CallbackToken>(), Ok(CallbackToken::QuizByNumber));
    }

    #[test]
    fn test_parse_numbered_tokens() {
        assert_eq!("cases_page_2".parse::<CallbackToken>(), Ok(CallbackToken::CasesPage(2)));
        assert_eq!("case_7".parse::<CallbackToken>(), Ok(CallbackToken::Case(7)));
        assert_eq!("quiz_case_12".parse::<CallbackToken>(), Ok(CallbackToken::QuizCase(12)));
        assert_eq!(
            "answer_3_1".parse::<CallbackToken>(),
            Ok(CallbackToken::Answer { case_id: 3, option: 1 })
        );
    }

    #[test]
    fn test_rejects_malformed_tokens() {
        for data in [
            "",
            "Menu_teach",
            "case_",
            "case_-1",
            "case_+1",
            "case_1_2",
            "answer_1",
            "answer_1_x",
            "case:3",
            "case_select_3",
            "case_select:",
            "answer:1_2",
            "answer:1:x",
            "cases_page:-1",
            "case_99999999999",
            "cases_page_1 ",
        ] {
            assert_eq!(
                data.parse::<CallbackToken>(),
                Err(BotError::MalformedToken(data.to_string())),
                "{data:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_longest_token_fits_payload_limit() {
        let token = CallbackToken::Answer {
            case_id: u32::MAX,
            option: usize::MAX,
        };
        assert!(token.to_string().len() <= MAX_TOKEN_LEN);
    }

    #[test]
    fn test_parse_colon_aliases() {
        assert_eq!("case_select:3".parse::<CallbackToken>(), Ok(CallbackToken::Case(3)));
        assert_eq!("cases_page:1".parse::<CallbackToken>(), Ok(CallbackToken::CasesPage(1)));
        assert_eq!("quiz_case:12".parse::<CallbackToken>(), Ok(CallbackToken::QuizCase(12)));
        assert_eq!(
            "answer:3:1".parse::<CallbackToken>(),
            Ok(CallbackToken::Answer { case_id: 3, option: 1 })
        );
        // Aliases are re-emitted in the underscore spelling
        assert_eq!("case_select:3".parse::<CallbackToken>().unwrap().to_string(), "case_3");
        assert_eq!("answer:3:1".parse::<CallbackToken>().unwrap().to_string(), "answer_3_1");
    }
}
