mod handler;
mod model;

pub use handler::{
    add_new_article,
    article_for_edit,
    edit_article_text,
    edit_article_with_pic,
    list_articles,
    list_more_articles,
    single_article,
};
