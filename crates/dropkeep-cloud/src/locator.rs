//! Name based resource lookup
//!
//! Names are not unique at the provider. Every lookup here applies the same
//! tie-break: the first match in the order the listing call returned wins.
//! Providers do not promise a listing order, so "first" means first in that
//! particular response and nothing more. Absence is a normal outcome and is
//! returned as `None`, never as an error.

use crate::error::Result;
use crate::model::{Droplet, Image, SshKey};
use crate::provider::DropletProvider;

/// Which images a lookup may consider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageScope {
    /// Account snapshots only. Public OS templates are never candidates.
    #[default]
    PrivateOnly,
    /// Every image the listing returns
    Any,
}

impl ImageScope {
    fn admits(self, image: &Image) -> bool {
        match self {
            ImageScope::PrivateOnly => image.is_snapshot(),
            ImageScope::Any => true,
        }
    }
}

/// First element of `items` (in sequence order) satisfying `predicate`.
pub fn first_match<T, F>(items: impl IntoIterator<Item = T>, mut predicate: F) -> Option<T>
where
    F: FnMut(&T) -> bool,
{
    items.into_iter().find(|item| predicate(item))
}

/// Droplet named `name`, if any
pub async fn find_droplet<P>(provider: &P, name: &str) -> Result<Option<Droplet>>
where
    P: DropletProvider + ?Sized,
{
    let droplets = provider.list_droplets().await?;
    Ok(first_match(droplets, |d| d.name == name))
}

/// Image named `name` within `scope`, if any
pub async fn find_image<P>(provider: &P, name: &str, scope: ImageScope) -> Result<Option<Image>>
where
    P: DropletProvider + ?Sized,
{
    let images = provider.list_images().await?;
    Ok(first_match(images, |i| scope.admits(i) && i.name == name))
}

/// Private images in listing order
pub async fn list_snapshots<P>(provider: &P) -> Result<Vec<Image>>
where
    P: DropletProvider + ?Sized,
{
    let images = provider.list_images().await?;
    Ok(images.into_iter().filter(Image::is_snapshot).collect())
}

/// First SSH key on the account. Accounts with several keys always get the
/// first one listed.
pub async fn first_ssh_key<P>(provider: &P) -> Result<Option<SshKey>>
where
    P: DropletProvider + ?Sized,
{
    let keys = provider.list_ssh_keys().await?;
    Ok(first_match(keys, |_| true))
}
