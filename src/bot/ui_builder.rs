//! UI Builder module for rendering screens into message text and keyboards
//!
//! Rendering is pure: it reads the catalog and the translations, and never
//! talks to Telegram.

use std::path::PathBuf;
use teloxide::utils::html;

use crate::catalog::Case;
use crate::context::AppContext;
use crate::screen::{CallbackToken, Screen};

/// How the message text must be interpreted by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    Plain,
    Html,
}

/// Whether the view replaces the screen or is a transient alert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Screen,
    Alert,
}

/// One inline keyboard button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub data: String,
}

impl Button {
    pub fn new(label: impl Into<String>, token: CallbackToken) -> Self {
        Self {
            label: label.into(),
            data: token.to_string(),
        }
    }
}

/// Everything needed to display a screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedView {
    pub text: String,
    pub format: TextFormat,
    pub buttons: Vec<Vec<Button>>,
    pub media: Option<PathBuf>,
    pub kind: ViewKind,
}

impl RenderedView {
    fn plain(text: String, buttons: Vec<Vec<Button>>) -> Self {
        Self {
            text,
            format: TextFormat::Plain,
            buttons,
            media: None,
            kind: ViewKind::Screen,
        }
    }

    fn html(text: String, buttons: Vec<Vec<Button>>) -> Self {
        Self {
            format: TextFormat::Html,
            ..Self::plain(text, buttons)
        }
    }

    /// A short notice shown as a popup, leaving the current screen untouched
    pub fn alert(text: String) -> Self {
        Self {
            kind: ViewKind::Alert,
            ..Self::plain(text, Vec::new())
        }
    }

    pub fn is_alert(&self) -> bool {
        self.kind == ViewKind::Alert
    }

    /// Same content without the image, used when photo delivery fails
    pub fn without_media(&self) -> Self {
        Self {
            media: None,
            ..self.clone()
        }
    }

    /// Every button's callback data, row by row
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.buttons.iter().flatten().map(|button| button.data.as_str())
    }
}

/// Renders screens in one language
pub struct ScreenRenderer<'a> {
    ctx: &'a AppContext,
    language: &'a str,
}

impl<'a> ScreenRenderer<'a> {
    pub fn new(ctx: &'a AppContext, language: &'a str) -> Self {
        Self { ctx, language }
    }

    fn t(&self, key: &str) -> String {
        self.ctx.localization.t(key, self.language)
    }

    /// Render a screen. Screens naming an unknown case become a "not found" alert.
    pub fn render(&self, screen: &Screen) -> RenderedView {
        match *screen {
            Screen::MainMenu { returning } => self.main_menu(returning),
            Screen::TeachIntro => self.teach_intro(),
            Screen::CaseList { page } => self.case_list(page),
            Screen::QuizMenu => self.quiz_menu(),
            Screen::AwaitingCaseNumber => RenderedView::plain(self.t("ask-case-number"), Vec::new()),
            Screen::CaseDetail { case_id } => match self.ctx.catalog.lookup(case_id) {
                Some(case) => self.case_detail(case),
                None => self.not_found(),
            },
            Screen::QuizQuestion { case_id } => match self.ctx.catalog.lookup(case_id) {
                Some(case) => self.quiz_question(case),
                None => self.not_found(),
            },
            Screen::QuizResult { case_id, chosen } => match self.ctx.catalog.lookup(case_id) {
                Some(case) => self.quiz_result(case, chosen),
                None => self.not_found(),
            },
        }
    }

    /// Reply to a number outside the catalog
    pub fn invalid_number(&self) -> RenderedView {
        RenderedView::plain(self.t("invalid-number"), Vec::new())
    }

    /// Reply to text the bot does not understand
    pub fn help_hint(&self) -> RenderedView {
        RenderedView::plain(self.t("help-hint"), Vec::new())
    }

    pub fn not_found(&self) -> RenderedView {
        RenderedView::alert(self.t("case-not-found"))
    }

    fn back_main_row(&self) -> Vec<Button> {
        vec![Button::new(self.t("button-back-main"), CallbackToken::BackMain)]
    }

    fn main_menu(&self, returning: bool) -> RenderedView {
        let buttons = vec![
            vec![Button::new(self.t("button-teach"), CallbackToken::MenuTeach)],
            vec![Button::new(self.t("button-cases"), CallbackToken::MenuCases)],
            vec![Button::new(self.t("button-quiz"), CallbackToken::MenuQuiz)],
        ];

        if returning {
            RenderedView::plain(self.t("back-to-main"), buttons)
        } else {
            RenderedView::html(self.t("welcome"), buttons)
        }
    }

    fn teach_intro(&self) -> RenderedView {
        RenderedView::plain(self.t("teach-intro"), vec![self.back_main_row()])
    }

    fn case_list(&self, page: usize) -> RenderedView {
        let page_size = self.ctx.settings.cases_per_page;
        let cases = self.ctx.catalog.page(page, page_size);

        let mut buttons: Vec<Vec<Button>> = cases
            .iter()
            .map(|case| {
                vec![Button::new(
                    format!("{}. {}", case.id, case.title),
                    CallbackToken::Case(case.id),
                )]
            })
            .collect();

        let mut nav = Vec::new();
        if page > 0 {
            nav.push(Button::new(
                self.t("button-prev"),
                CallbackToken::CasesPage(page - 1),
            ));
        }
        if self.ctx.catalog.has_next_page(page, page_size) {
            nav.push(Button::new(
                self.t("button-next"),
                CallbackToken::CasesPage(page + 1),
            ));
        }
        nav.push(Button::new(self.t("button-back-main"), CallbackToken::BackMain));
        buttons.push(nav);

        let text = if cases.is_empty() {
            self.t("cases-page-empty")
        } else {
            self.t("cases-title")
        };

        RenderedView::plain(text, buttons)
    }

    fn case_detail(&self, case: &Case) -> RenderedView {
        let caption = format!(
            "<b>{}</b>\n\n{}",
            html::escape(&case.title),
            html::escape(&case.description)
        );
        let buttons = vec![
            vec![Button::new(
                self.t("button-quiz-this-case"),
                CallbackToken::QuizCase(case.id),
            )],
            vec![Button::new(self.t("button-back-cases"), CallbackToken::MenuCases)],
        ];

        RenderedView {
            media: Some(self.ctx.catalog.image_path(case)),
            ..RenderedView::html(caption, buttons)
        }
    }

    fn quiz_menu(&self) -> RenderedView {
        let buttons = vec![
            vec![Button::new(self.t("button-quiz-random"), CallbackToken::QuizRandom)],
            vec![Button::new(
                self.t("button-quiz-by-number"),
                CallbackToken::QuizByNumber,
            )],
            self.back_main_row(),
        ];
        RenderedView::plain(self.t("quiz-menu-title"), buttons)
    }

    fn quiz_question(&self, case: &Case) -> RenderedView {
        let caption = format!(
            "<b>{}</b>\n{}",
            html::escape(&self.t("quiz-question-header")),
            html::escape(&case.quiz.question)
        );

        let mut buttons: Vec<Vec<Button>> = case
            .quiz
            .options
            .iter()
            .enumerate()
            .map(|(option, label)| {
                vec![Button::new(
                    label.clone(),
                    CallbackToken::Answer {
                        case_id: case.id,
                        option,
                    },
                )]
            })
            .collect();
        buttons.push(vec![Button::new(
            self.t("button-back-case"),
            CallbackToken::Case(case.id),
        )]);

        RenderedView {
            media: Some(self.ctx.catalog.image_path(case)),
            ..RenderedView::html(caption, buttons)
        }
    }

    fn quiz_result(&self, case: &Case, chosen: usize) -> RenderedView {
        let buttons = vec![vec![
            Button::new(self.t("button-quiz-another"), CallbackToken::QuizRandom),
            Button::new(self.t("button-back-main"), CallbackToken::BackMain),
        ]];

        if case.quiz.is_correct(chosen) {
            RenderedView::plain(self.t("quiz-correct"), buttons)
        } else {
            let answer = html::escape(case.quiz.correct_option());
            let text = self
                .ctx
                .localization
                .t_args("quiz-wrong", &[("answer", answer.as_str())], self.language);
            RenderedView::html(text, buttons)
        }
    }
}
