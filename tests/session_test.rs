mod common;

use anyhow::Result;
use common::{expense, reopen, test_service};
use tallybook::application::AppError;
use tallybook::domain::{DenialReason, Feature, LoginProvider};

#[tokio::test]
async fn test_login_and_logout() -> Result<()> {
    let (service, temp) = test_service().await?;
    assert!(service.current_user().await.is_none());

    let user = service.login(LoginProvider::Google).await?;
    assert_eq!(user.id, "user_123");
    assert_eq!(user.email, "user@gmail.com");
    assert!(!user.is_pro);
    assert_eq!(service.current_user().await, Some(user.clone()));
    drop(service);

    let reopened = reopen(&temp).await?;
    assert_eq!(reopened.current_user().await, Some(user));

    reopened.logout().await?;
    assert!(reopened.current_user().await.is_none());
    drop(reopened);

    let reopened = reopen(&temp).await?;
    assert!(reopened.current_user().await.is_none());

    Ok(())
}

#[tokio::test]
async fn test_subscribe_requires_sign_in() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let err = service.subscribe().await.unwrap_err();
    assert!(matches!(err, AppError::SignInRequired));

    Ok(())
}

#[tokio::test]
async fn test_subscription_persists() -> Result<()> {
    let (service, temp) = test_service().await?;
    service.login(LoginProvider::Email).await?;

    let user = service.subscribe().await?;
    assert!(user.is_pro);
    drop(service);

    let reopened = reopen(&temp).await?;
    assert!(reopened.current_user().await.map(|u| u.is_pro).unwrap_or(false));

    Ok(())
}

#[tokio::test]
async fn test_sync_is_gated() -> Result<()> {
    let (service, _temp) = test_service().await?;
    service
        .add_transaction(expense("2024-03-01", "Food", "10"))
        .await?;

    let err = service.sync().await.unwrap_err();
    assert!(matches!(
        err,
        AppError::PermissionDenied {
            feature: Feature::CloudSync,
            reason: DenialReason::SignInRequired,
        }
    ));

    service.login(LoginProvider::Google).await?;
    let err = service.sync().await.unwrap_err();
    assert!(err.is_upgrade_prompt());

    service.subscribe().await?;
    let report = service.sync().await?;
    assert_eq!(report.synced, 1);

    Ok(())
}

#[tokio::test]
async fn test_logout_keeps_transactions() -> Result<()> {
    let (service, _temp) = test_service().await?;
    service.login(LoginProvider::Google).await?;
    service
        .add_transaction(expense("2024-03-01", "Food", "10"))
        .await?;

    service.logout().await?;
    assert_eq!(service.transactions().await.len(), 1);

    Ok(())
}
