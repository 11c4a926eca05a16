use rss::{Category, Channel, Guid, Item};

use crate::{
    config::{SiteMeta, blog_path, post_path},
    head::BlogPostHead,
};

/// RSS 2.0 document for the collection. Undated posts are left out.
pub fn rss(heads: &[BlogPostHead], meta: &SiteMeta) -> String {
    let mut channel = Channel::default();
    channel.set_title(meta.title.clone());
    channel.set_link(meta.absolute(&blog_path()));
    channel.set_description(meta.description.clone());
    channel.set_language(Some(meta.language.clone()));

    let items: Vec<Item> = heads
        .iter()
        .filter_map(|head| item(head, meta))
        .collect();

    channel.set_items(items);
    channel.to_string()
}

fn item(head: &BlogPostHead, meta: &SiteMeta) -> Option<Item> {
    let published = head.published_at?;

    let mut item = Item::default();
    item.set_title(Some(head.title.clone()));
    item.set_link(Some(meta.absolute(&head.url)));
    // Guid URLs stay valid when a post directory is renamed.
    item.set_guid(Some(Guid {
        value: meta.absolute(&post_path(&head.guid)),
        permalink: false,
    }));
    item.set_description(Some(head.description.clone()));
    item.set_author(Some(head.author.name.clone()));
    item.set_pub_date(Some(published.to_rfc2822()));

    if !head.tags.is_empty() {
        let cats: Vec<Category> = head
            .tags
            .iter()
            .map(|t| {
                let mut c = Category::default();
                c.set_name(t.name.clone());
                c
            })
            .collect();
        item.set_categories(cats);
    }

    Some(item)
}
