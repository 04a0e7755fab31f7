use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::data::loader::load_csv;
use crate::data::model::RecordTable;
use crate::predictor::loader::load_model;
use crate::predictor::{FeatureRecord, Predictor};
use crate::view::{
    ChartContent, Page, Recommendation, RecommendationPage, View, build_chart, feature_bounds,
    minimum_inputs,
};

// ---------------------------------------------------------------------------
// Load-once caches
// ---------------------------------------------------------------------------

/// Outcome of the one-time model load.
pub struct ModelSlot {
    pub predictor: Option<Box<dyn Predictor>>,
    /// User-facing reason the model is absent.
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    /// Dataset, loaded on the first frame and kept for the process lifetime.
    dataset: OnceCell<Result<Arc<RecordTable>, String>>,

    /// Model, loaded on the first frame and kept for the process lifetime.
    model: OnceCell<ModelSlot>,

    /// Active menu entry.
    view: View,

    /// Slider values; reset whenever the recommendation view is entered.
    inputs: Option<FeatureRecord>,

    /// Last prediction, reused while the inputs stay the same.
    last_prediction: Option<(FeatureRecord, Recommendation)>,

    /// Chart summaries per view (the dataset never changes).
    charts: BTreeMap<View, Arc<ChartContent>>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            dataset: OnceCell::new(),
            model: OnceCell::new(),
            view: View::default(),
            inputs: None,
            last_prediction: None,
            charts: BTreeMap::new(),
        }
    }

    /// State with both caches already filled.
    #[cfg(test)]
    pub fn with_sources(
        config: AppConfig,
        table: RecordTable,
        predictor: Option<Box<dyn Predictor>>,
        model_error: Option<String>,
    ) -> Self {
        let state = Self::new(config);
        let _ = state.dataset.set(Ok(Arc::new(table)));
        let _ = state.model.set(ModelSlot {
            predictor,
            error: model_error,
        });
        state
    }

    /// The dataset, loading it on first use.
    pub fn dataset(&self) -> Result<Arc<RecordTable>, String> {
        self.dataset
            .get_or_init(|| match load_csv(&self.config.dataset_path) {
                Ok(table) => {
                    log::info!(
                        "Loaded {} rows with columns {:?}",
                        table.len(),
                        table.column_names()
                    );
                    if !table.schema().has_crop {
                        log::warn!("Dataset has no Crop column; crop charts will fall back");
                    }
                    if let Err(missing) = table.schema().require_features() {
                        log::warn!("Recommendation disabled: {missing}");
                    }
                    Ok(Arc::new(table))
                }
                Err(e) => {
                    log::error!("Failed to load dataset: {e:#}");
                    Err(format!("Error: {e:#}"))
                }
            })
            .clone()
    }

    /// The model slot, loading it on first use.
    pub fn model(&self) -> &ModelSlot {
        self.model.get_or_init(|| match load_model(&self.config.model_path) {
            Ok(artifact) => {
                log::info!(
                    "Loaded model {} ({})",
                    self.config.model_path.display(),
                    artifact.describe()
                );
                ModelSlot {
                    predictor: Some(Box::new(artifact)),
                    error: None,
                }
            }
            Err(e) => {
                log::error!("Failed to load model: {}", e.detail());
                ModelSlot {
                    predictor: None,
                    error: Some(e.to_string()),
                }
            }
        })
    }

    pub fn view(&self) -> View {
        self.view
    }

    /// Switch the active view. Entering the recommendation view starts from
    /// fresh inputs.
    pub fn select_view(&mut self, view: View) {
        if view != self.view {
            log::debug!("View: {} -> {}", self.view.label(), view.label());
            self.view = view;
            self.inputs = None;
        }
    }

    /// Current slider values, if the recommendation view has been drawn.
    #[cfg(test)]
    pub fn inputs(&self) -> Option<FeatureRecord> {
        self.inputs
    }

    pub fn set_inputs(&mut self, inputs: FeatureRecord) {
        self.inputs = Some(inputs);
    }

    /// Build the page for the active view. Exactly one view per call.
    pub fn page(&mut self) -> Result<Page, String> {
        let table = self.dataset()?;
        let view = self.view;

        match view {
            View::Dataset => Ok(Page::Dataset(table)),
            View::CropRecommendation => Ok(Page::Recommendation(self.recommendation_page(&table))),
            _ => {
                let content = match self.charts.get(&view) {
                    Some(content) => Arc::clone(content),
                    None => {
                        let Some(content) = build_chart(view, &table, &self.config) else {
                            return Err(format!("{} has no chart", view.label()));
                        };
                        let content = Arc::new(content);
                        self.charts.insert(view, Arc::clone(&content));
                        content
                    }
                };
                Ok(Page::Chart { view, content })
            }
        }
    }

    fn recommendation_page(&mut self, table: &RecordTable) -> RecommendationPage {
        let bounds = match feature_bounds(table) {
            Ok(bounds) => bounds,
            Err(missing) => return RecommendationPage::Unavailable(missing),
        };
        let inputs = *self.inputs.get_or_insert_with(|| minimum_inputs(&bounds));
        let outcome = self.recommend(&inputs);
        RecommendationPage::Ready {
            bounds,
            inputs,
            outcome,
        }
    }

    /// Ask the model for a crop, reusing the previous answer for equal inputs.
    pub fn recommend(&mut self, inputs: &FeatureRecord) -> Recommendation {
        if let Some((prev, outcome)) = &self.last_prediction {
            if prev == inputs {
                return outcome.clone();
            }
        }

        let outcome = match &self.model().predictor {
            None => Recommendation::ModelUnavailable,
            Some(predictor) => {
                log::debug!("Predicting for {inputs}");
                match predictor.predict(inputs) {
                    Ok(crop) => Recommendation::Crop(crop),
                    Err(e) => {
                        log::error!("Prediction failed: {e}");
                        Recommendation::Failed(format!("Error in predicting crop: {e}"))
                    }
                }
            }
        };
        if outcome != Recommendation::ModelUnavailable {
            self.last_prediction = Some((*inputs, outcome.clone()));
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::data::model::fixtures::{crop_table, table};
    use crate::predictor::PredictError;
    use crate::view::UNABLE_TO_RECOMMEND;

    /// Records every call and answers with a fixed result.
    struct ScriptedPredictor {
        calls: Rc<RefCell<Vec<FeatureRecord>>>,
        answer: Result<String, PredictError>,
    }

    impl Predictor for ScriptedPredictor {
        fn predict(&self, record: &FeatureRecord) -> Result<String, PredictError> {
            self.calls.borrow_mut().push(*record);
            self.answer.clone()
        }
    }

    fn scripted(answer: Result<String, PredictError>) -> (Box<dyn Predictor>, Rc<RefCell<Vec<FeatureRecord>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        (
            Box::new(ScriptedPredictor {
                calls: Rc::clone(&calls),
                answer,
            }),
            calls,
        )
    }

    #[test]
    fn every_label_renders_exactly_its_own_view() {
        let mut state = AppState::with_sources(AppConfig::default(), crop_table(), None, None);
        for view in View::ALL {
            state.select_view(view);
            let page = state.page().unwrap();
            assert_eq!(page.view(), view);
            match (view, &page) {
                (View::Dataset, Page::Dataset(_)) => {}
                (View::CropRecommendation, Page::Recommendation(_)) => {}
                (View::CropDistribution, Page::Chart { content, .. }) => {
                    assert!(matches!(**content, ChartContent::CropShares(Ok(_))))
                }
                (View::SoilNutrients | View::Climate, Page::Chart { content, .. }) => {
                    assert!(matches!(**content, ChartContent::Histograms(_)))
                }
                (View::TemperatureVsHumidity, Page::Chart { content, .. }) => {
                    assert!(matches!(**content, ChartContent::Scatter { .. }))
                }
                (View::CorrelationHeatmap, Page::Chart { content, .. }) => {
                    assert!(matches!(**content, ChartContent::Heatmap(_)))
                }
                (view, page) => panic!("{view:?} rendered {:?}", page.view()),
            }
        }
    }

    #[test]
    fn crop_distribution_reports_shares() {
        let mut state = AppState::with_sources(AppConfig::default(), crop_table(), None, None);
        state.select_view(View::CropDistribution);
        let Page::Chart { content, .. } = state.page().unwrap() else {
            panic!("expected chart");
        };
        let ChartContent::CropShares(Ok(shares)) = &*content else {
            panic!("expected shares");
        };
        let got: Vec<(String, String)> = shares
            .iter()
            .map(|s| (s.label.clone(), s.percent_label()))
            .collect();
        assert_eq!(
            got,
            vec![
                ("Rice".to_string(), "60.0%".to_string()),
                ("Maize".to_string(), "20.0%".to_string()),
                ("Wheat".to_string(), "20.0%".to_string()),
            ]
        );
    }

    #[test]
    fn missing_model_file_disables_recommendation() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            model_path: dir.path().join("missing.json"),
            ..AppConfig::default()
        };
        let state = AppState::new(config);
        let slot = state.model();
        assert!(slot.predictor.is_none());
        assert!(slot.error.as_deref().unwrap().starts_with("Model file not found"));
    }

    #[test]
    fn recommendation_without_model_echoes_inputs_only() {
        let mut state = AppState::with_sources(
            AppConfig::default(),
            crop_table(),
            None,
            Some("Model file not found.".into()),
        );
        state.select_view(View::CropRecommendation);
        let Page::Recommendation(RecommendationPage::Ready { inputs, outcome, .. }) =
            state.page().unwrap()
        else {
            panic!("expected ready recommendation page");
        };
        assert_eq!(outcome, Recommendation::ModelUnavailable);
        assert_eq!(inputs.echo_lines()[0], "- Nitrogen: 60");
        assert_eq!(outcome.message(), UNABLE_TO_RECOMMEND);
        assert_eq!(
            outcome.message(),
            "Unable to recommend crop due to model loading error."
        );
    }

    #[test]
    fn minimum_inputs_are_predicted_once_and_shown_verbatim() {
        let (predictor, calls) = scripted(Ok("Kidney Beans".into()));
        let mut state =
            AppState::with_sources(AppConfig::default(), crop_table(), Some(predictor), None);
        state.select_view(View::CropRecommendation);

        for _ in 0..3 {
            let Page::Recommendation(RecommendationPage::Ready { outcome, .. }) =
                state.page().unwrap()
            else {
                panic!("expected ready recommendation page");
            };
            assert_eq!(outcome, Recommendation::Crop("Kidney Beans".into()));
        }

        let calls = calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].values(),
            &[60.0, 35.0, 40.0, 20.13, 80.15, 6.5, 202.93]
        );
    }

    #[test]
    fn changed_inputs_trigger_a_new_prediction() {
        let (predictor, calls) = scripted(Ok("Rice".into()));
        let mut state =
            AppState::with_sources(AppConfig::default(), crop_table(), Some(predictor), None);
        state.select_view(View::CropRecommendation);
        state.page().unwrap();

        let mut inputs = state.inputs().unwrap();
        inputs.set(crate::data::model::Feature::Humidity, 81.0);
        state.set_inputs(inputs);
        state.page().unwrap();

        assert_eq!(calls.borrow().len(), 2);
    }

    #[test]
    fn prediction_errors_are_reported() {
        let (predictor, _) = scripted(Err(PredictError::Empty));
        let mut state =
            AppState::with_sources(AppConfig::default(), crop_table(), Some(predictor), None);
        state.select_view(View::CropRecommendation);
        let Page::Recommendation(RecommendationPage::Ready { outcome, .. }) =
            state.page().unwrap()
        else {
            panic!("expected ready recommendation page");
        };
        assert_eq!(
            outcome,
            Recommendation::Failed("Error in predicting crop: model has no estimators to vote".into())
        );
    }

    #[test]
    fn leaving_the_view_resets_inputs() {
        let mut state = AppState::with_sources(AppConfig::default(), crop_table(), None, None);
        state.select_view(View::CropRecommendation);
        state.page().unwrap();
        let mut inputs = state.inputs().unwrap();
        inputs.set(crate::data::model::Feature::Nitrogen, 85.0);
        state.set_inputs(inputs);

        state.select_view(View::Dataset);
        state.select_view(View::CropRecommendation);
        assert!(state.inputs().is_none());
        let Page::Recommendation(RecommendationPage::Ready { inputs, .. }) = state.page().unwrap()
        else {
            panic!("expected ready recommendation page");
        };
        assert_eq!(inputs.get(crate::data::model::Feature::Nitrogen), 60.0);
    }

    #[test]
    fn incomplete_schema_disables_recommendation() {
        let mut state = AppState::with_sources(
            AppConfig::default(),
            table(&[("Nitrogen", &["1", "2"])]),
            None,
            None,
        );
        state.select_view(View::CropRecommendation);
        assert!(matches!(
            state.page().unwrap(),
            Page::Recommendation(RecommendationPage::Unavailable(_))
        ));
    }

    #[test]
    fn missing_dataset_is_reported_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::new(AppConfig {
            dataset_path: dir.path().join("none.csv"),
            ..AppConfig::default()
        });
        let err = state.page().unwrap_err();
        assert!(err.contains("opening dataset"));
    }
}
