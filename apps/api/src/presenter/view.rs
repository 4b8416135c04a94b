//! Result view: the two rendered documents, layout preferences and paywall.

use serde::{Deserialize, Serialize};

use crate::models::analysis::AnalysisResult;
use crate::presenter::markdown::render_markdown;
use crate::presenter::paywall::{Paywall, PaywallView};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// Both documents side by side.
    #[default]
    Split,
    /// One document, picked by the active tab.
    Single,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentTab {
    #[default]
    English,
    Chinese,
}

impl DocumentTab {
    pub fn title(&self) -> &'static str {
        match self {
            DocumentTab::English => "English Optimized",
            DocumentTab::Chinese => "中文翻译版",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ViewPreferences {
    pub mode: ViewMode,
    pub active_tab: DocumentTab,
}

impl ViewPreferences {
    /// Documents on screen, in display order.
    pub fn visible_tabs(&self) -> Vec<DocumentTab> {
        match self.mode {
            ViewMode::Split => vec![DocumentTab::English, DocumentTab::Chinese],
            ViewMode::Single => vec![self.active_tab],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Excellent,
    Fair,
    Poor,
}

impl ScoreBand {
    /// > 80 excellent, > 60 fair, anything else poor.
    pub fn from_score(score: f64) -> Self {
        if score > 80.0 {
            ScoreBand::Excellent
        } else if score > 60.0 {
            ScoreBand::Fair
        } else {
            ScoreBand::Poor
        }
    }

    pub fn advice(&self) -> &'static str {
        match self {
            ScoreBand::Excellent => "优秀！简历结构清晰，关键词丰富。",
            ScoreBand::Fair | ScoreBand::Poor => "建议根据右侧优化版本调整格式与用词。",
        }
    }
}

/// Everything the Result stage shows. Built once per analysis result; only the
/// preferences and paywall change afterwards.
#[derive(Debug)]
pub struct ResultView {
    result: AnalysisResult,
    english_html: String,
    chinese_html: String,
    prefs: ViewPreferences,
    paywall: Paywall,
}

impl ResultView {
    pub fn new(result: AnalysisResult) -> Self {
        let english_html = render_markdown(&result.optimized_content_english);
        let chinese_html = render_markdown(&result.optimized_content_chinese);
        Self {
            result,
            english_html,
            chinese_html,
            prefs: ViewPreferences::default(),
            paywall: Paywall::new(),
        }
    }

    pub fn result(&self) -> &AnalysisResult {
        &self.result
    }

    pub fn preferences(&self) -> ViewPreferences {
        self.prefs
    }

    pub fn set_mode(&mut self, mode: ViewMode) {
        self.prefs.mode = mode;
    }

    /// The tab is remembered even in split mode; it applies once single mode is picked.
    pub fn set_active_tab(&mut self, tab: DocumentTab) {
        self.prefs.active_tab = tab;
    }

    pub fn paywall(&self) -> &Paywall {
        &self.paywall
    }

    pub fn paywall_mut(&mut self) -> &mut Paywall {
        &mut self.paywall
    }

    fn html_for(&self, tab: DocumentTab) -> &str {
        match tab {
            DocumentTab::English => &self.english_html,
            DocumentTab::Chinese => &self.chinese_html,
        }
    }

    pub fn render(&self) -> ResultPage {
        let result = self.result();
        let prefs = self.preferences();
        let band = ScoreBand::from_score(result.ats_score);
        ResultPage {
            ats_score: result.ats_score,
            score_band: band,
            score_advice: band.advice(),
            summary: result.summary.clone(),
            key_improvements: result.key_improvements.clone(),
            missing_keywords: result.missing_keywords.clone(),
            view_mode: prefs.mode,
            active_tab: prefs.active_tab,
            documents: prefs
                .visible_tabs()
                .into_iter()
                .map(|tab| RenderedDocument {
                    tab,
                    title: tab.title(),
                    html: self.html_for(tab).to_string(),
                })
                .collect(),
            paywall: self.paywall().view(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderedDocument {
    pub tab: DocumentTab,
    pub title: &'static str,
    pub html: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultPage {
    pub ats_score: f64,
    pub score_band: ScoreBand,
    pub score_advice: &'static str,
    pub summary: String,
    pub key_improvements: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub view_mode: ViewMode,
    pub active_tab: DocumentTab,
    pub documents: Vec<RenderedDocument>,
    pub paywall: PaywallView,
}
