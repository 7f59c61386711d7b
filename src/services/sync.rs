//! sync.rs
//!
//! Live-обновления профиля пользователя. Явная подписка вместо вечного
//! фонового слушателя: `subscribe` запускает опрос, Drop гарантированно
//! его останавливает вместе с концом сессии.

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::models::UserProfile;
use crate::services::{DocumentStoreClient, UserDirectory};

/// Подписка на снапшоты профиля. Новые значения публикуются в watch-канал
/// только при изменении содержимого документа.
pub struct ProfileSubscription {
    rx: watch::Receiver<Option<UserProfile>>,
    handle: JoinHandle<()>,
}

impl ProfileSubscription {
    pub fn subscribe(
        store: DocumentStoreClient,
        user_id: String,
        poll_interval: Duration,
    ) -> Self {
        let (tx, rx) = watch::channel(None);

        let handle = tokio::spawn(async move {
            info!("Profile subscription started for {}", user_id);
            let mut tick = interval(poll_interval);
            tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tick.tick().await;

                match store.fetch_profile(&user_id).await {
                    Ok(profile) => {
                        let changed = tx.send_if_modified(|current| {
                            if *current != profile {
                                *current = profile.clone();
                                true
                            } else {
                                false
                            }
                        });
                        if changed {
                            debug!("Profile snapshot updated for {}", user_id);
                        }
                    }
                    Err(e) => {
                        // Временный сбой не рвёт подписку - следующий тик повторит
                        warn!("Profile poll failed for {}: {}", user_id, e);
                    }
                }
            }
        });

        Self { rx, handle }
    }

    /// Отдельный получатель снапшотов (например, для другого виджета).
    pub fn receiver(&self) -> watch::Receiver<Option<UserProfile>> {
        self.rx.clone()
    }

    /// Последний известный снапшот профиля.
    pub fn current(&self) -> Option<UserProfile> {
        self.rx.borrow().clone()
    }

    /// Ждёт следующего изменения профиля.
    pub async fn changed(&mut self) -> Option<UserProfile> {
        if self.rx.changed().await.is_err() {
            return None;
        }
        self.rx.borrow_and_update().clone()
    }
}

impl Drop for ProfileSubscription {
    // Отписка гарантирована: конец сессии останавливает опрос.
    fn drop(&mut self) {
        self.handle.abort();
    }
}
