pub mod binary;
pub mod io;
pub mod rotate;

pub use self::binary::{
    binarize_otsu_inverted, close_binary, dilate_binary, erode_binary, erode_rgba3x3, erode_square,
};
pub use self::rotate::rotate_image;
