pub mod category;
pub mod ids;
pub mod invite;
pub mod note;
pub mod set_entry;

pub use category::{CATEGORY_DISPLAY_ORDER, Category, ParseCategoryError};
pub use ids::{InviteId, NoteId, ParseIdError, SetId};
pub use invite::{Invite, InviteCodeError, normalize_invite_code};
pub use note::{Note, NoteError};
pub use set_entry::{SetEntry, SetError, normalize_exercise_name};
