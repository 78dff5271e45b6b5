//! Controlador del catálogo de recompensas
//!
//! Reconciliación: el alta inserta la recompensa devuelta por el servidor,
//! el borrado la quita del store.

use std::sync::Arc;

use crate::controllers::dispatcher::{FormState, MutationDispatcher};
use crate::controllers::projection::{ListView, NoFilters, PageView};
use crate::controllers::resource_store::ResourceStore;
use crate::dto::reward_dto::{CreateRewardBody, RewardForm};
use crate::models::{EntityId, Reward};
use crate::services::RewardApi;
use crate::utils::errors::AppResult;

pub struct RewardsController {
    api: Arc<dyn RewardApi>,
    store: ResourceStore<Reward>,
    list: ListView<NoFilters>,
    dispatcher: MutationDispatcher,
    form: FormState<RewardForm>,
}

impl RewardsController {
    pub fn new(api: Arc<dyn RewardApi>, page_size: usize) -> Self {
        Self {
            api,
            store: ResourceStore::new(),
            list: ListView::new(page_size),
            dispatcher: MutationDispatcher::new(),
            form: FormState::new(),
        }
    }

    pub async fn load(&mut self) -> AppResult<()> {
        self.store.load(self.api.list_rewards()).await
    }

    pub fn store(&self) -> &ResourceStore<Reward> {
        &self.store
    }

    pub fn list_mut(&mut self) -> &mut ListView<NoFilters> {
        &mut self.list
    }

    pub fn page(&self) -> PageView<'_, Reward> {
        self.list.view(self.store.items())
    }

    pub fn dispatcher_mut(&mut self) -> &mut MutationDispatcher {
        &mut self.dispatcher
    }

    pub fn form(&self) -> &FormState<RewardForm> {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormState<RewardForm> {
        &mut self.form
    }

    pub async fn create(&mut self) -> AppResult<Reward> {
        let api = Arc::clone(&self.api);
        let reward = self
            .dispatcher
            .submit(
                "create reward",
                &mut self.form,
                move |values| {
                    let body = CreateRewardBody::from(values);
                    async move { api.create_reward(&body).await }
                },
                |reward: &Reward| format!("Reward \"{}\" created successfully", reward.title),
            )
            .await?;

        self.store.upsert(reward.clone());
        Ok(reward)
    }

    pub async fn delete(&mut self, id: &EntityId) -> AppResult<()> {
        self.dispatcher
            .dispatch("delete reward", self.api.delete_reward(id), |_| {
                "Reward deleted successfully".to_string()
            })
            .await?;
        self.store.remove_one(id);
        Ok(())
    }
}
